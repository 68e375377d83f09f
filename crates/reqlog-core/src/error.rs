//! Error types for reqlog

use thiserror::Error;

/// Result type alias for middleware construction
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// Misconfiguration detected while building a logging layer
///
/// These are raised by the factories, never per request, so a bad setup
/// surfaces while the application is being wired together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No options were supplied at all
    #[error("options are required by the reqlog middleware")]
    MissingOptions,

    /// The options carry an empty transport list
    #[error("transports are required by the reqlog middleware")]
    NoTransports,

    /// The configured level is not one of the known level names
    #[error("unknown log level: {0}")]
    InvalidLevel(String),

    /// A transport was configured with an unknown output format
    #[error("unknown log format: {0}")]
    InvalidFormat(String),
}

/// Failure reported by a transport through its completion callback
#[derive(Debug, Error)]
pub enum TransportError {
    /// IO error while writing the entry
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The entry could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote endpoint rejected or failed the delivery
    #[error("HTTP error: {0}")]
    Http(String),

    /// The sink is closed, poisoned or has no runtime to run on
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Result type for transport deliveries
pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages() {
        assert_eq!(
            ConfigError::MissingOptions.to_string(),
            "options are required by the reqlog middleware"
        );
        assert_eq!(
            ConfigError::NoTransports.to_string(),
            "transports are required by the reqlog middleware"
        );
        assert_eq!(
            ConfigError::InvalidLevel("loud".into()).to_string(),
            "unknown log level: loud"
        );
    }

    #[test]
    fn transport_error_from_io() {
        let err: TransportError =
            std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, TransportError::Io(_)));
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
