//! Domain error types
//!
//! All errors raised by snapshot-sender are domain-specific and don't expose
//! third-party types. Collaborator failures are reported with these types and
//! then logged by the completion decider rather than propagated to the job.

use thiserror::Error;

/// Main snapshot-sender error type
#[derive(Debug, Error)]
pub enum SenderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Metric registration or push failures
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Success indicator could not be published
    #[error("Success indicator error: {0}")]
    Publish(#[from] PublishError),

    /// Monitoring notification could not be sent
    #[error("Notification error: {0}")]
    Notification(String),

    /// Export status could not be determined
    #[error("Export status error: {0}")]
    Status(String),

    /// The hosted job could not be spawned or awaited
    #[error("Job error: {0}")]
    Job(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Success indicator errors
///
/// Kept separate so the HTTP status of a rejected indicator survives into the
/// logs without leaking the HTTP client's error type.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Failed to reach the receiving endpoint
    #[error("Failed to connect to indicator endpoint: {0}")]
    ConnectionFailed(String),

    /// Endpoint answered with a non-success status
    #[error("Indicator rejected: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl From<std::io::Error> for SenderError {
    fn from(err: std::io::Error) -> Self {
        SenderError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SenderError {
    fn from(err: serde_json::Error) -> Self {
        SenderError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SenderError {
    fn from(err: toml::de::Error) -> Self {
        SenderError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<prometheus::Error> for SenderError {
    fn from(err: prometheus::Error) -> Self {
        SenderError::Metrics(err.to_string())
    }
}

impl From<reqwest::Error> for SenderError {
    fn from(err: reqwest::Error) -> Self {
        SenderError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_error_display() {
        let err = SenderError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_publish_error_conversion() {
        let publish_err = PublishError::Rejected {
            status: 503,
            message: "busy".to_string(),
        };
        let err: SenderError = publish_err.into();
        assert!(matches!(err, SenderError::Publish(_)));
        assert_eq!(
            err.to_string(),
            "Success indicator error: Indicator rejected: 503 - busy"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SenderError = io_err.into();
        assert!(matches!(err, SenderError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SenderError = json_err.into();
        assert!(matches!(err, SenderError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SenderError = toml_err.into();
        assert!(matches!(err, SenderError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_prometheus_error_conversion() {
        let err: SenderError = prometheus::Error::Msg("duplicate".to_string()).into();
        assert!(matches!(err, SenderError::Metrics(_)));
    }

    #[test]
    fn test_sender_error_implements_std_error() {
        let err = SenderError::Status("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
