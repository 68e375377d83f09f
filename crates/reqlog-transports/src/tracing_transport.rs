//! Transport that re-emits entries as `tracing` events

use reqlog_core::{Level, LogCallback, LogEntry, Transport};

/// Forwards every entry to the active `tracing` subscriber
///
/// Levels map onto `tracing` levels: `error` and `warn` keep their names,
/// `info` and `http` become INFO, `verbose` and `debug` become DEBUG and
/// `silly` becomes TRACE. Events are emitted under the `reqlog` target with
/// the fields `level`, `meta` (JSON) and the entry's message.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingTransport;

impl TracingTransport {
    /// Create a new tracing transport
    pub fn new() -> Self {
        Self
    }
}

/// The `tracing` level an entry is emitted at
pub fn tracing_level(level: Level) -> tracing::Level {
    match level {
        Level::Error => tracing::Level::ERROR,
        Level::Warn => tracing::Level::WARN,
        Level::Info | Level::Http => tracing::Level::INFO,
        Level::Verbose | Level::Debug => tracing::Level::DEBUG,
        Level::Silly => tracing::Level::TRACE,
    }
}

impl Transport for TracingTransport {
    fn name(&self) -> &str {
        "tracing"
    }

    fn log(&self, entry: LogEntry, callback: LogCallback) {
        let level = entry.level.as_str();
        let meta = serde_json::to_string(&entry.meta).unwrap_or_default();
        let message = entry.message.as_str();

        match tracing_level(entry.level) {
            tracing::Level::ERROR => {
                tracing::error!(target: "reqlog", level = level, meta = %meta, "{}", message)
            }
            tracing::Level::WARN => {
                tracing::warn!(target: "reqlog", level = level, meta = %meta, "{}", message)
            }
            tracing::Level::INFO => {
                tracing::info!(target: "reqlog", level = level, meta = %meta, "{}", message)
            }
            tracing::Level::DEBUG => {
                tracing::debug!(target: "reqlog", level = level, meta = %meta, "{}", message)
            }
            _ => tracing::trace!(target: "reqlog", level = level, meta = %meta, "{}", message),
        }

        callback(Ok(()));
    }
}
