//! Environment-driven logger configuration
//!
//! Reads `REQLOG_*` variables (optionally from a `.env` file) and turns them
//! into [`LoggerOptions`] with the matching transports attached.
//!
//! | Variable             | Meaning                                       |
//! |----------------------|-----------------------------------------------|
//! | `REQLOG_LEVEL`       | request log level (`info` when unset)         |
//! | `REQLOG_ALLOW_LIST`  | comma separated request fields to log         |
//! | `REQLOG_FORMAT`      | `json`, `simple` or `logfmt` for console/file |
//! | `REQLOG_CONSOLE`     | `true` to log to stdout                       |
//! | `REQLOG_FILE`        | path of a log file to append to               |
//! | `REQLOG_HTTP_URL`    | collector URL (needs the `http` feature)      |
//! | `REQLOG_TRACING`     | `true` to forward entries to `tracing`        |
//!
//! # Example
//!
//! ```rust,ignore
//! use reqlog_transports::config::{load_dotenv, LoggerSettings};
//!
//! load_dotenv();
//! let options = LoggerSettings::from_env()?.into_options()?;
//! let layer = reqlog_core::logger(options)?;
//! ```

use crate::console::ConsoleTransport;
use crate::file::FileTransport;
use crate::format::LogFormat;
use crate::tracing_transport::TracingTransport;
use reqlog_core::{AllowList, ConfigError, Level, LoggerOptions, TransportError};
use serde::Deserialize;
use thiserror::Error;

/// Prefix shared by every variable
pub const ENV_PREFIX: &str = "REQLOG_";

/// Error type for configuration loading failures
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Environment variable deserialization failed
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),

    /// A value was read but is not valid
    #[error(transparent)]
    Invalid(#[from] ConfigError),

    /// A configured transport could not be opened
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The variable needs a feature this build does not have
    #[error("{0}")]
    Unsupported(String),
}

/// Logger settings read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Request log level
    pub level: Option<String>,
    /// Comma separated allow-list
    pub allow_list: Option<String>,
    /// Line format for console and file output
    pub format: Option<String>,
    /// Log to stdout
    pub console: bool,
    /// Log file path
    pub file: Option<String>,
    /// HTTP collector URL
    pub http_url: Option<String>,
    /// Forward to `tracing`
    pub tracing: bool,
}

impl LoggerSettings {
    /// Read `REQLOG_*` variables from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load `.env` first, then read the environment
    pub fn load() -> Result<Self, SettingsError> {
        load_dotenv();
        Self::from_env()
    }

    /// Parsed allow-list, `None` when unset
    pub fn allow_list(&self) -> Option<AllowList> {
        self.allow_list.as_deref().map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .collect()
        })
    }

    /// Build logger options with a transport for every enabled sink
    ///
    /// Options without any sink are returned as is; building a layer from
    /// them fails with [`ConfigError::NoTransports`].
    pub fn into_options(self) -> Result<LoggerOptions, SettingsError> {
        let format = match self.format.as_deref() {
            Some(format) => format.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        let mut options = LoggerOptions::new();

        if let Some(level) = self.level.as_deref() {
            level.parse::<Level>()?;
            options = options.level(level);
        }
        if let Some(allow_list) = self.allow_list() {
            options = options.allow_list(allow_list);
        }

        if self.console {
            options = options.transport(ConsoleTransport::new().format(format));
        }
        if let Some(ref path) = self.file {
            options = options.transport(FileTransport::new(path)?.format(format));
        }
        if let Some(ref url) = self.http_url {
            options = with_http(options, url)?;
        }
        if self.tracing {
            options = options.transport(TracingTransport::new());
        }

        tracing::debug!(transports = options.transport_count(), "loaded logger settings");
        Ok(options)
    }
}

#[cfg(feature = "http")]
fn with_http(options: LoggerOptions, url: &str) -> Result<LoggerOptions, SettingsError> {
    use crate::http::{HttpTransport, HttpTransportConfig};

    let transport = HttpTransport::new(HttpTransportConfig::new(url))?;
    Ok(options.transport(transport))
}

#[cfg(not(feature = "http"))]
fn with_http(_options: LoggerOptions, _url: &str) -> Result<LoggerOptions, SettingsError> {
    Err(SettingsError::Unsupported(
        "REQLOG_HTTP_URL requires the `http` feature".to_string(),
    ))
}

/// Load environment variables from a `.env` file
///
/// A missing file is not an error, and variables that are already set are
/// left alone.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file path
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}
