//! Log entries handed to transports

use crate::error::ConfigError;
use crate::exception::ExceptionInfo;
use crate::filter::FilteredRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log severity, most severe first
///
/// The names follow the npm convention most logging backends understand.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Failures that need attention
    Error,
    /// Suspicious but handled conditions
    Warn,
    /// Normal operational messages (default)
    #[default]
    Info,
    /// HTTP access logs
    Http,
    /// Extra operational detail
    Verbose,
    /// Debugging output
    Debug,
    /// Everything
    Silly,
}

impl Level {
    /// All levels, most severe first
    pub const ALL: [Level; 7] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Http,
        Level::Verbose,
        Level::Debug,
        Level::Silly,
    ];

    /// The level name
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Http => "http",
            Level::Verbose => "verbose",
            Level::Debug => "debug",
            Level::Silly => "silly",
        }
    }

    /// Whether an entry at this level passes a sink configured for `threshold`
    pub fn is_enabled_for(&self, threshold: Level) -> bool {
        *self <= threshold
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "http" => Ok(Level::Http),
            "verbose" => Ok(Level::Verbose),
            "debug" => Ok(Level::Debug),
            "silly" | "trace" => Ok(Level::Silly),
            _ => Err(ConfigError::InvalidLevel(s.to_string())),
        }
    }
}

/// Structured metadata attached to every entry
///
/// Serializes as `{"req": {...}}`; on the error path the exception
/// diagnostics are flattened into the same object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    /// The filtered request
    pub req: FilteredRecord,
    /// Error diagnostics, only set by the error logger
    #[serde(flatten)]
    pub exception: Option<ExceptionInfo>,
}

impl Metadata {
    /// Metadata for a request log
    pub fn request(req: FilteredRecord) -> Self {
        Self {
            req,
            exception: None,
        }
    }

    /// Metadata for an error log
    pub fn exception(exception: ExceptionInfo, req: FilteredRecord) -> Self {
        Self {
            req,
            exception: Some(exception),
        }
    }
}

/// A single log record, built per event and given to each transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Severity
    pub level: Level,
    /// Short human-readable summary
    pub message: String,
    /// Structured metadata
    pub meta: Metadata,
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(level: Level, message: impl Into<String>, meta: Metadata) -> Self {
        Self {
            timestamp: unix_millis(SystemTime::now()),
            level,
            message: message.into(),
            meta,
        }
    }
}

/// Milliseconds since the Unix epoch, saturating at zero for earlier times
pub fn unix_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
