//! The sink abstraction log entries are dispatched to

use crate::entry::{Level, LogEntry, Metadata};
use crate::error::TransportResult;
use std::sync::Arc;

/// Completion handler a transport calls once it has handled an entry
pub type LogCallback = Box<dyn FnOnce(TransportResult<()>) + Send + 'static>;

/// A callback that ignores the outcome
///
/// This is what the middleware hands out: a failing sink must never affect
/// request handling.
pub fn noop_callback() -> LogCallback {
    Box::new(|_| {})
}

/// A logging backend
///
/// Calls are fire-and-forget from the caller's point of view. A transport
/// that does slow work should hand it off (spawn a task, queue it) and
/// return; the outcome is reported through the callback only.
///
/// # Example
///
/// ```rust
/// use reqlog_core::{LogCallback, LogEntry, Transport};
///
/// struct Stdout;
///
/// impl Transport for Stdout {
///     fn name(&self) -> &str {
///         "stdout"
///     }
///
///     fn log(&self, entry: LogEntry, callback: LogCallback) {
///         println!("{}: {}", entry.level, entry.message);
///         callback(Ok(()));
///     }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Short identifier used in diagnostics
    fn name(&self) -> &str;

    /// Accept an entry
    fn log(&self, entry: LogEntry, callback: LogCallback);

    /// Accept an error report, logged at [`Level::Error`] by default
    fn log_exception(&self, message: &str, meta: Metadata, callback: LogCallback) {
        self.log(LogEntry::new(Level::Error, message, meta), callback);
    }
}

/// A transport shared between layers
pub type SharedTransport = Arc<dyn Transport>;

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn log(&self, entry: LogEntry, callback: LogCallback) {
        (**self).log(entry, callback)
    }

    fn log_exception(&self, message: &str, meta: Metadata, callback: LogCallback) {
        (**self).log_exception(message, meta, callback)
    }
}
