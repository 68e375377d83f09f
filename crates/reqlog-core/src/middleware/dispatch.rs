//! Shared fan-out used by both logging layers

use crate::entry::{Level, LogEntry, Metadata};
use crate::error::{ConfigError, Result};
use crate::filter::{
    default_request_filter, filter_request_with, AllowList, FieldSelector, FilteredRecord,
};
use crate::options::LoggerOptions;
use crate::record::RequestRecord;
use crate::transport::{noop_callback, SharedTransport};
use std::sync::Arc;

/// Message transports receive for error reports
pub const EXCEPTION_MESSAGE: &str = "middlewareError";

/// Validated, immutable configuration captured by a layer
pub(crate) struct Dispatcher {
    transports: Vec<SharedTransport>,
    selector: Arc<dyn FieldSelector>,
    allow_list: AllowList,
    pub(crate) level: Level,
}

impl Dispatcher {
    pub(crate) fn from_options(options: Option<LoggerOptions>) -> Result<Self> {
        let options = options.ok_or(ConfigError::MissingOptions)?;
        if options.transports.is_empty() {
            return Err(ConfigError::NoTransports);
        }

        let level = match options.level.as_deref() {
            Some(level) => level.parse()?,
            None => Level::Info,
        };

        let selector: Arc<dyn FieldSelector> = match options.request_filter {
            Some(selector) => selector,
            None => Arc::new(default_request_filter),
        };

        Ok(Self {
            transports: options.transports,
            selector,
            allow_list: options.allow_list.unwrap_or_default(),
            level,
        })
    }

    pub(crate) fn filter(&self, record: &RequestRecord) -> FilteredRecord {
        filter_request_with(record, &self.allow_list, |record, field| {
            self.selector.select(record, field)
        })
    }

    pub(crate) fn transport_count(&self) -> usize {
        self.transports.len()
    }

    /// Hand one entry to every transport without waiting on any of them
    pub(crate) fn log(&self, level: Level, message: &str, meta: Metadata) {
        tracing::trace!(
            level = %level,
            summary = %message,
            transports = self.transports.len(),
            "dispatching log entry"
        );

        let entry = LogEntry::new(level, message, meta);
        for transport in &self.transports {
            transport.log(entry.clone(), noop_callback());
        }
    }

    pub(crate) fn log_exception(&self, meta: Metadata) {
        tracing::trace!(
            transports = self.transports.len(),
            "dispatching error report"
        );

        for transport in &self.transports {
            transport.log_exception(EXCEPTION_MESSAGE, meta.clone(), noop_callback());
        }
    }
}

/// `"HTTP <method> <url>"`, with `-` for missing parts
pub(crate) fn request_message(record: &RequestRecord) -> String {
    let part = |name: &str| {
        record
            .get(name)
            .and_then(|v| v.as_str())
            .unwrap_or("-")
            .to_string()
    };
    format!("HTTP {} {}", part("method"), part("url"))
}
