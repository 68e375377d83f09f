//! # reqlog core
//!
//! Filtering and dispatch behind the reqlog request/error logging
//! middleware.
//!
//! An inbound request is turned into a [`RequestRecord`], cut down to the
//! fields of an [`AllowList`] by [`filter_request`], and handed as a
//! [`LogEntry`] to every configured [`Transport`]. Transports are called
//! fire-and-forget; their outcome never reaches the request.
//!
//! This crate is not meant to be used directly. Use `reqlog` instead.

mod entry;
mod error;
mod exception;
mod filter;
pub mod middleware;
mod options;
mod record;
#[cfg(test)]
mod test_support;
mod transport;

// Public API
pub use entry::{unix_millis, Level, LogEntry, Metadata};
pub use error::{ConfigError, Result, TransportError, TransportResult};
pub use exception::{ExceptionInfo, OsInfo, ProcessInfo};
pub use filter::{
    default_request_filter, filter_request, filter_request_with, try_filter_request, AllowList,
    FieldSelector, FilteredRecord, REQUEST_ALLOW_LIST,
};
pub use middleware::{
    error_logger, logger, ErrorLogger, ErrorLoggerLayer, RequestLogger, RequestLoggerLayer,
    EXCEPTION_MESSAGE,
};
pub use options::LoggerOptions;
pub use record::{OriginalUri, RequestFields, RequestRecord};
pub use transport::{noop_callback, LogCallback, SharedTransport, Transport};
