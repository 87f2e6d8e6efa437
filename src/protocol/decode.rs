//! Upstream response body decoding.
//!
//! # Responsibilities
//! - Read bounded metadata bodies (info, list)
//! - Decode `.info` / `@latest` JSON into [`ModuleVersionInfo`]
//! - Split `@v/list` bodies into version strings
//!
//! `.zip` and `.mod` bodies are never decoded; they are handed to handlers
//! as streams.

use axum::body::Body;
use bytes::Bytes;
use serde::Deserialize;

use crate::error::DecodeError;
use crate::protocol::semver::is_valid_semver;
use crate::protocol::types::ModuleVersionInfo;

/// Collect a metadata body, failing if it exceeds `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, DecodeError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| DecodeError::Body(e.to_string()))
}

/// Decode a version info document.
///
/// Only the first JSON value is read; anything after it is ignored. Missing
/// fields take their defaults, so a missing `Version` fails the semver check.
pub fn decode_info(body: &[u8]) -> Result<ModuleVersionInfo, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let info = ModuleVersionInfo::deserialize(&mut deserializer)?;
    if !is_valid_semver(&info.version) {
        return Err(DecodeError::InvalidVersion(info.version));
    }
    Ok(info)
}

/// Decode a version list, one version per line in upstream order.
///
/// A final newline does not produce an empty trailing entry, and `\r\n`
/// endings are accepted. Blank lines in the middle are kept as-is.
pub fn decode_version_list(body: &[u8]) -> Result<Vec<String>, DecodeError> {
    let text = std::str::from_utf8(body)?;
    Ok(text.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_info() {
        let info =
            decode_info(br#"{"Version":"v0.0.1","Time":"2019-01-02T22:52:24-08:00"}"#).unwrap();
        assert_eq!(info.version, "v0.0.1");
        assert_eq!(info.time.to_rfc3339(), "2019-01-02T22:52:24-08:00");
    }

    #[test]
    fn test_decode_info_ignores_unknown_fields() {
        let info = decode_info(
            br#"{"Version":"v1.2.3","Time":"2020-05-01T10:00:00Z","Origin":{"VCS":"git"}}"#,
        )
        .unwrap();
        assert_eq!(info.version, "v1.2.3");
    }

    #[test]
    fn test_decode_info_lowercase_fields() {
        let info = decode_info(br#"{"version":"v1.0.0","time":"2020-05-01T10:00:00Z"}"#).unwrap();
        assert_eq!(info.version, "v1.0.0");
    }

    #[test]
    fn test_decode_info_malformed() {
        assert!(matches!(decode_info(b""), Err(DecodeError::Json(_))));
        assert!(matches!(decode_info(b"{not json"), Err(DecodeError::Json(_))));
        assert!(matches!(decode_info(b"   "), Err(DecodeError::Json(_))));
        assert!(matches!(decode_info(b"[1, 2]"), Err(DecodeError::Json(_))));
        assert!(matches!(
            decode_info(br#"{"Version":"v1.0.0","Time":"yesterday"}"#),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_decode_info_missing_time() {
        let info = decode_info(br#"{"Version":"v0.0.1"}"#).unwrap();
        assert_eq!(info.version, "v0.0.1");
        assert_eq!(info.time.timestamp(), 0);
    }

    #[test]
    fn test_decode_info_ignores_trailing_data() {
        let info = decode_info(
            b"{\"Version\":\"v0.0.1\",\"Time\":\"2019-01-02T22:52:24-08:00\"}\n{\"Version\":\"v9\"} junk",
        )
        .unwrap();
        assert_eq!(info.version, "v0.0.1");
    }

    #[test]
    fn test_decode_info_missing_version() {
        let err = decode_info(br#"{"Time":"2020-05-01T10:00:00Z"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidVersion(v) if v.is_empty()));
    }

    #[test]
    fn test_decode_info_rejects_bad_version() {
        let err = decode_info(br#"{"Version":"latest","Time":"2020-05-01T10:00:00Z"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidVersion(v) if v == "latest"));
    }

    #[test]
    fn test_version_list() {
        assert_eq!(decode_version_list(b"v0.0.1\nv0.0.2").unwrap(), vec!["v0.0.1", "v0.0.2"]);
    }

    #[test]
    fn test_version_list_drops_single_trailing_newline() {
        assert_eq!(decode_version_list(b"v0.0.1\nv0.0.2\n").unwrap(), vec!["v0.0.1", "v0.0.2"]);
        // Only one trailing empty entry is dropped.
        assert_eq!(decode_version_list(b"v0.0.1\n\n").unwrap(), vec!["v0.0.1", ""]);
    }

    #[test]
    fn test_version_list_edge_cases() {
        assert!(decode_version_list(b"").unwrap().is_empty());
        assert_eq!(decode_version_list(b"\n").unwrap(), vec![""]);
        assert_eq!(decode_version_list(b"v1.0.0\r\nv1.1.0\r\n").unwrap(), vec!["v1.0.0", "v1.1.0"]);
        assert_eq!(decode_version_list(b"v1\n\nv2").unwrap(), vec!["v1", "", "v2"]);
        assert_eq!(decode_version_list(b"v1\nv1").unwrap(), vec!["v1", "v1"]);
        assert!(matches!(decode_version_list(&[0xff, 0xfe]), Err(DecodeError::Utf8(_))));
    }

    #[tokio::test]
    async fn test_read_body_limit() {
        let bytes = read_body(Body::from("v1.0.0\n"), 64).await.unwrap();
        assert_eq!(&bytes[..], b"v1.0.0\n");

        let err = read_body(Body::from(vec![b'a'; 128]), 64).await.unwrap_err();
        assert!(matches!(err, DecodeError::Body(_)));
    }
}
