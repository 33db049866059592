//! Error type definitions for the M3U aggregator

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Output artifacts could not be persisted
    #[error("Output error: {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Summary serialization failures
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors raised while fetching or decoding one playlist source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The fetch did not complete in time
    #[error("Connection timeout after {timeout:?}: {url}")]
    Timeout { url: String, timeout: Duration },

    /// The remote answered with a non-success status
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// Network level failures (DNS, TLS, connection reset)
    #[error("Transport error: {url} - {message}")]
    Transport { url: String, message: String },

    /// Body was not valid UTF-8
    #[error("Decode error: {url} - {message}")]
    Decode { url: String, message: String },

    /// Document does not carry the `#EXTM3U` marker
    #[error("Malformed playlist: {url}")]
    Malformed { url: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap an I/O failure on an output path
    pub fn output<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }

    /// Whether this error must stop the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Output { .. } | Self::Configuration { .. })
    }
}

impl SourceError {
    /// Short machine-friendly label used in run reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Http { .. } => "http",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
            Self::Malformed { .. } => "malformed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_errors_are_fatal() {
        let err = AppError::output(
            "/tmp/out",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/tmp/out"));
    }

    #[test]
    fn test_serialization_errors_are_not_fatal() {
        let err: AppError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(!err.is_fatal());
        assert!(err.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn test_source_error_kind() {
        let err = SourceError::Http {
            status: 500,
            url: "http://example.com".to_string(),
        };
        assert_eq!(err.kind(), "http");
        assert_eq!(err.to_string(), "HTTP error: 500 - http://example.com");
    }
}
