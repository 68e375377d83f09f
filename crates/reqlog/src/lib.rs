//! # reqlog
//!
//! Request and error logging middleware for `tower` services.
//!
//! Two layers share one configuration shape:
//!
//! - [`logger`] logs every request as `"HTTP <method> <url>"` with the
//!   request as metadata, then calls the wrapped service.
//! - [`error_logger`] reports every error the wrapped service returns and
//!   hands the same error back to the caller.
//!
//! Only allow-listed request fields reach the sinks. The default
//! [`REQUEST_ALLOW_LIST`] is `url`, `headers`, `method`, `httpVersion`,
//! `originalUrl` and `query`; bodies and anything attached by other
//! middleware stay out unless you opt in.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reqlog::prelude::*;
//! use tower::ServiceBuilder;
//!
//! let console = ConsoleTransport::new().format(LogFormat::Simple);
//!
//! let service = ServiceBuilder::new()
//!     .layer(logger(LoggerOptions::new().transport(console.clone()))?)
//!     .layer(error_logger(LoggerOptions::new().transport(console))?)
//!     .service(app);
//! ```
//!
//! ## Optional Features
//!
//! - `http` - [`HttpTransport`](transports::HttpTransport) posting entries to a collector
//! - `config` - build options from `REQLOG_*` environment variables
//! - `full` - all optional features enabled
//!
//! ```toml
//! [dependencies]
//! reqlog = { version = "0.1", features = ["config"] }
//! ```

// Re-export core functionality
pub use reqlog_core::*;

/// Sinks and formatters
pub mod transports {
    pub use reqlog_transports::*;
}

#[cfg(feature = "config")]
pub use reqlog_transports::config;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a `tracing` subscriber that prints to stdout
///
/// The filter comes from `RUST_LOG`, falling back to `info,reqlog=debug`.
/// Does nothing if a global subscriber is already set, so it is safe to call
/// more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqlog=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Prelude module - import everything you need with `use reqlog::prelude::*`
pub mod prelude {
    pub use reqlog_core::{
        // Layers
        error_logger, logger, ErrorLoggerLayer, LoggerOptions, RequestLoggerLayer,
        // Filtering
        default_request_filter, filter_request, filter_request_with, AllowList, RequestFields,
        RequestRecord, REQUEST_ALLOW_LIST,
        // Entries
        Level, LogEntry, Metadata,
        // Transports
        LogCallback, Transport,
        // Errors
        ConfigError, TransportError,
    };

    pub use reqlog_transports::{
        ConsoleTransport, FileTransport, LogFormat, MemoryTransport, TracingTransport,
    };

    #[cfg(feature = "http")]
    pub use reqlog_transports::{HttpTransport, HttpTransportConfig};

    #[cfg(feature = "config")]
    pub use reqlog_transports::{LoggerSettings, SettingsError};

    pub use crate::init_tracing;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_builds_both_layers() {
        let memory = MemoryTransport::new();
        let options = LoggerOptions::new().transport(memory.clone());

        let requests = logger(options.clone()).unwrap();
        let errors = error_logger(options).unwrap();

        assert_eq!(requests.transport_count(), 1);
        assert_eq!(errors.transport_count(), 1);
        assert_eq!(requests.level(), Level::Info);
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("tracing initialised twice without panicking");
    }
}
