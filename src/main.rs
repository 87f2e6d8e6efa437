//! gomod-proxy
//!
//! Go module proxy that forwards every request to an upstream module proxy
//! and re-serves the result.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use gomod_proxy::config::loader::{apply_env_overrides, finalize, read_config};
use gomod_proxy::dispatch::passthrough_handlers;
use gomod_proxy::lifecycle::{build_proxy, spawn_signal_listener, Shutdown};
use gomod_proxy::observability::{logging::init_logging, metrics::init_metrics};
use gomod_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "gomod-proxy")]
#[command(about = "Go module proxy forwarding to an upstream module proxy", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream module proxy base URL (overrides config and UPSTREAM_GOPROXY).
    #[arg(short, long)]
    upstream: Option<String>,

    /// Listen address, e.g. 127.0.0.1:8080.
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = read_config(cli.config.as_deref())?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    if let Some(upstream) = cli.upstream {
        config.upstream.base_url = upstream;
    }
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    let config = finalize(config)?;

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gomod-proxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated in finalize.
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let proxy = Arc::new(build_proxy(&config, passthrough_handlers()?)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signals = spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(&config, proxy);
    server.run(listener, shutdown).await?;

    signals.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
