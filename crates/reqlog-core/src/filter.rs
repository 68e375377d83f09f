//! Allow-list filtering of request records
//!
//! Only fields named in an [`AllowList`] can reach a log line, and only
//! with the value a [`FieldSelector`] chooses for them. The body is not on
//! the default list because it routinely carries passwords and tokens.
//!
//! # Example
//!
//! ```rust
//! use reqlog_core::{default_request_filter, filter_request, RequestRecord};
//! use serde_json::json;
//!
//! let record = RequestRecord::new()
//!     .with("url", "/a")
//!     .with("method", "GET")
//!     .with("secret", "x");
//!
//! let filtered = filter_request(&record, default_request_filter);
//! assert_eq!(json!(filtered), json!({"url": "/a", "method": "GET"}));
//! ```

use crate::record::RequestRecord;
use serde_json::{Map, Value};
use std::convert::Infallible;

/// Request fields that are safe to log by default
pub const REQUEST_ALLOW_LIST: &[&str] = &[
    "url",
    "headers",
    "method",
    "httpVersion",
    "originalUrl",
    "query",
];

/// The filtered, owned copy of a record that is handed to transports
pub type FilteredRecord = Map<String, Value>;

/// Ordered set of field names allowed into log metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    fields: Vec<String>,
}

impl AllowList {
    /// Create an allow-list from the given names, dropping duplicates
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::empty();
        list.extend(fields);
        list
    }

    /// An allow-list that lets nothing through
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field name
    pub fn with(mut self, field: impl Into<String>) -> Self {
        self.push(field.into());
        self
    }

    /// Remove a field name
    pub fn without(mut self, field: &str) -> Self {
        self.fields.retain(|f| f != field);
        self
    }

    /// Add several field names
    pub fn extend<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            self.push(field.into());
        }
    }

    fn push(&mut self, field: String) {
        if !self.contains(&field) {
            self.fields.push(field);
        }
    }

    /// Check whether a field may be logged
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Iterate over the allowed names in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Number of allowed names
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing is allowed
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(REQUEST_ALLOW_LIST.iter().copied())
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Chooses the value logged for an allow-listed field
///
/// Returning `None` leaves the field out of the log. Every
/// `Fn(&RequestRecord, &str) -> Option<Value>` closure is a selector, so
/// redaction is usually a one-liner:
///
/// ```rust
/// use reqlog_core::{default_request_filter, FieldSelector, RequestRecord};
/// use serde_json::Value;
///
/// let hide_query = |record: &RequestRecord, field: &str| -> Option<Value> {
///     if field == "query" {
///         None
///     } else {
///         default_request_filter(record, field)
///     }
/// };
///
/// let record = RequestRecord::new().with("query", "q=1");
/// assert_eq!(hide_query.select(&record, "query"), None);
/// ```
pub trait FieldSelector: Send + Sync {
    /// Select the value to log for `field`, or `None` to omit it
    fn select(&self, record: &RequestRecord, field: &str) -> Option<Value>;
}

impl<F> FieldSelector for F
where
    F: Fn(&RequestRecord, &str) -> Option<Value> + Send + Sync,
{
    fn select(&self, record: &RequestRecord, field: &str) -> Option<Value> {
        self(record, field)
    }
}

/// Passes the record's value through unchanged
///
/// The value is cloned, so the logged copy is independent of the request
/// once it has been filtered.
pub fn default_request_filter(record: &RequestRecord, field: &str) -> Option<Value> {
    record.get(field).cloned()
}

/// Filter a record against [`REQUEST_ALLOW_LIST`]
pub fn filter_request<F>(record: &RequestRecord, selector: F) -> FilteredRecord
where
    F: Fn(&RequestRecord, &str) -> Option<Value>,
{
    into_ok(try_filter_fields(
        record,
        |field| REQUEST_ALLOW_LIST.iter().any(|allowed| *allowed == field),
        |record, field| Ok(selector(record, field)),
    ))
}

/// Filter a record against a caller-supplied allow-list
pub fn filter_request_with<F>(
    record: &RequestRecord,
    allow_list: &AllowList,
    selector: F,
) -> FilteredRecord
where
    F: Fn(&RequestRecord, &str) -> Option<Value>,
{
    into_ok(try_filter_fields(
        record,
        |field| allow_list.contains(field),
        |record, field| Ok(selector(record, field)),
    ))
}

/// Filter with a fallible selector
///
/// The first selector error is returned as is; no partial record is
/// produced.
pub fn try_filter_request<F, E>(
    record: &RequestRecord,
    allow_list: &AllowList,
    selector: F,
) -> Result<FilteredRecord, E>
where
    F: Fn(&RequestRecord, &str) -> Result<Option<Value>, E>,
{
    try_filter_fields(record, |field| allow_list.contains(field), selector)
}

fn try_filter_fields<A, F, E>(
    record: &RequestRecord,
    allowed: A,
    selector: F,
) -> Result<FilteredRecord, E>
where
    A: Fn(&str) -> bool,
    F: Fn(&RequestRecord, &str) -> Result<Option<Value>, E>,
{
    let mut filtered = Map::new();

    for field in record.field_names() {
        if !allowed(field) {
            continue;
        }

        if let Some(value) = selector(record, field)? {
            filtered.insert(field.to_string(), value);
        }
    }

    Ok(filtered)
}

fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
