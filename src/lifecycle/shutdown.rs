//! Shutdown coordination for the proxy.
//!
//! A single latch shared by the server and the signal task. Once triggered it
//! stays triggered, so tasks that start waiting late still observe it.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Graceful shutdown latch. Clones share the same state.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger shutdown. Repeated calls are no-ops.
    pub fn trigger(&self) {
        let already = self.tx.send_replace(true);
        if !already {
            tracing::info!("Shutdown triggered");
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Future resolving once shutdown has been triggered.
    ///
    /// Owns its receiver, so it can be handed to `with_graceful_shutdown`
    /// or moved into a spawned task.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            while !*rx.borrow_and_update() {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_every_waiter() {
        let shutdown = Shutdown::new();
        let a = tokio::spawn(shutdown.wait());
        let b = tokio::spawn(shutdown.clone().wait());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), async {
            a.await.unwrap();
            b.await.unwrap();
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_late_waiter_sees_earlier_trigger() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_pends_until_triggered() {
        let shutdown = Shutdown::default();
        assert!(!shutdown.is_triggered());
        let pending = tokio::time::timeout(Duration::from_millis(50), shutdown.wait()).await;
        assert!(pending.is_err());
    }
}
