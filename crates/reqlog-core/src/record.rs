//! The loggable view of an inbound request
//!
//! A [`RequestRecord`] is a flat set of named JSON fields describing a
//! request. It is what the allow-list filter enumerates, so anything that
//! ends up in a log line has to appear here first.

use http::{Extensions, HeaderMap, Method, Request, Uri, Version};
use serde::Serialize;
use serde_json::{Map, Value};

/// The URI a request was received with before any rewriting or nesting
///
/// Routers that strip a mount prefix should insert this extension so the
/// record can report both `url` and `originalUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalUri(pub Uri);

/// Extra fields attached to a request by earlier pipeline stages
///
/// They are merged into the record after the fields derived from the
/// request line and headers, and remain subject to the allow-list, so a
/// stage can expose e.g. a parsed `body` without it being logged unless the
/// allow-list opts in.
///
/// # Example
///
/// ```rust
/// use reqlog_core::RequestFields;
///
/// let mut req = http::Request::new(());
/// req.extensions_mut()
///     .insert(RequestFields::new().with("body", serde_json::json!({"name": "x"})));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFields(pub Map<String, Value>);

impl RequestFields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

/// Mapping-like record of an inbound request
///
/// Built from an [`http::Request`] it carries `url`, `originalUrl`,
/// `method`, `httpVersion`, `headers`, `query`, `path`, `protocol` and, when
/// known, `hostname`, plus whatever [`RequestFields`] were attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestRecord {
    fields: Map<String, Value>,
}

impl RequestRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an HTTP request without touching its body
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self::from_components(
            req.method(),
            req.uri(),
            req.version(),
            req.headers(),
            req.extensions(),
        )
    }

    /// Build a record from already split request parts
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self::from_components(
            &parts.method,
            &parts.uri,
            parts.version,
            &parts.headers,
            &parts.extensions,
        )
    }

    fn from_components(
        method: &Method,
        uri: &Uri,
        version: Version,
        headers: &HeaderMap,
        extensions: &Extensions,
    ) -> Self {
        let url = request_target(uri);
        let original_url = extensions
            .get::<OriginalUri>()
            .map(|original| request_target(&original.0))
            .unwrap_or_else(|| url.clone());

        let mut record = Self::new();
        record.insert("url", url);
        record.insert("originalUrl", original_url);
        record.insert("method", method.as_str());
        record.insert("httpVersion", http_version(version));
        record.insert("headers", headers_to_json(headers));
        record.insert("query", query_to_json(uri.query()));
        record.insert("path", uri.path());
        record.insert("protocol", uri.scheme_str().unwrap_or("http"));

        if let Some(hostname) = hostname(uri, headers) {
            record.insert("hostname", hostname);
        }

        if let Some(extra) = extensions.get::<RequestFields>() {
            for (name, value) in &extra.0 {
                record.insert(name.clone(), value.clone());
            }
        }

        record
    }

    /// Set a field, returning the previous value if any
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Remove a field
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check whether a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Names of the fields currently present
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Take the underlying JSON object
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for RequestRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RequestRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Path and query as they appeared on the request line
fn request_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}

fn http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "unknown",
    }
}

/// Header names are already lower-case in `http`; repeated values are joined
fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        map.insert(name.as_str().to_string(), Value::String(joined));
    }
    Value::Object(map)
}

/// Repeated keys collapse into an array, in order of appearance
fn query_to_json(query: Option<&str>) -> Value {
    let mut map = Map::new();
    let pairs: Vec<(String, String)> = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    for (key, value) in pairs {
        match map.get_mut(&key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                map.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(map)
}

fn hostname(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    if let Some(host) = uri.host() {
        return Some(host.to_string());
    }

    let host = headers.get(http::header::HOST)?.to_str().ok()?;
    let hostname = if host.starts_with('[') {
        // IPv6 literal, keep the brackets
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    };

    if hostname.is_empty() {
        None
    } else {
        Some(hostname.to_string())
    }
}
