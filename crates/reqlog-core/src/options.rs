//! Construction-time configuration for the logging layers

use crate::filter::{AllowList, FieldSelector};
use crate::transport::{SharedTransport, Transport};
use std::fmt;
use std::sync::Arc;

/// Options shared by [`logger`](crate::logger) and
/// [`error_logger`](crate::error_logger)
///
/// # Example
///
/// ```rust
/// use reqlog_core::{AllowList, LoggerOptions, LogCallback, LogEntry, Transport};
///
/// struct Discard;
///
/// impl Transport for Discard {
///     fn name(&self) -> &str {
///         "discard"
///     }
///     fn log(&self, _entry: LogEntry, callback: LogCallback) {
///         callback(Ok(()))
///     }
/// }
///
/// let options = LoggerOptions::new()
///     .transport(Discard)
///     .level("http")
///     .allow_list(AllowList::default().with("hostname"));
///
/// assert_eq!(options.transport_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LoggerOptions {
    pub(crate) transports: Vec<SharedTransport>,
    pub(crate) request_filter: Option<Arc<dyn FieldSelector>>,
    pub(crate) level: Option<String>,
    pub(crate) allow_list: Option<AllowList>,
}

impl LoggerOptions {
    /// Create empty options
    ///
    /// At least one transport must be added before building a layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transport
    pub fn transport<T: Transport>(mut self, transport: T) -> Self {
        self.transports.push(Arc::new(transport));
        self
    }

    /// Add a transport that is already shared
    pub fn shared_transport(mut self, transport: SharedTransport) -> Self {
        self.transports.push(transport);
        self
    }

    /// Add several shared transports
    pub fn transports<I>(mut self, transports: I) -> Self
    where
        I: IntoIterator<Item = SharedTransport>,
    {
        self.transports.extend(transports);
        self
    }

    /// Replace the default pass-through selector
    pub fn request_filter<F>(mut self, selector: F) -> Self
    where
        F: FieldSelector + 'static,
    {
        self.request_filter = Some(Arc::new(selector));
        self
    }

    /// Level used by the request logger (default `info`)
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Replace the default allow-list
    pub fn allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = Some(allow_list);
        self
    }

    /// Number of configured transports
    pub fn transport_count(&self) -> usize {
        self.transports.len()
    }
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field(
                "transports",
                &self.transports.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("request_filter", &self.request_filter.is_some())
            .field("level", &self.level)
            .field("allow_list", &self.allow_list)
            .finish()
    }
}
