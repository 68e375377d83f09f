//! Line formatters shared by the console and file transports

use reqlog_core::{ConfigError, LogEntry};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// Output format for line-oriented transports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line (default)
    #[default]
    Json,
    /// `level: message {meta}`
    Simple,
    /// Logfmt (key=value pairs)
    Logfmt,
}

impl LogFormat {
    /// Build the formatter for this format
    pub fn formatter(self) -> Box<dyn LogFormatter> {
        match self {
            LogFormat::Json => Box::new(JsonFormatter::new()),
            LogFormat::Simple => Box::new(SimpleFormatter::new()),
            LogFormat::Logfmt => Box::new(LogfmtFormatter::new()),
        }
    }

    /// The format name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Simple => "simple",
            LogFormat::Logfmt => "logfmt",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "simple" | "text" => Ok(LogFormat::Simple),
            "logfmt" => Ok(LogFormat::Logfmt),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Trait for log formatters
pub trait LogFormatter: Send + Sync {
    /// Format an entry as a single line, without the trailing newline
    fn format(&self, entry: &LogEntry) -> String;
}

/// Metadata of `entry` as a JSON object
fn meta_object(entry: &LogEntry) -> Map<String, Value> {
    match serde_json::to_value(&entry.meta) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// `entry` as one JSON object with the metadata keys at the top level
pub(crate) fn entry_json(entry: &LogEntry) -> Value {
    let mut obj = json!({
        "timestamp": entry.timestamp,
        "level": entry.level,
        "message": entry.message,
    });

    if let Value::Object(fields) = &mut obj {
        fields.extend(meta_object(entry));
    }
    obj
}

/// JSON log formatter
///
/// Metadata keys sit next to `timestamp`, `level` and `message`, so a
/// request log reads `{"timestamp":..,"level":"info","message":"HTTP GET /",
/// "req":{..}}`.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty print JSON
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pretty-printing JSON formatter
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        let obj = entry_json(entry);
        if self.pretty {
            serde_json::to_string_pretty(&obj).unwrap_or_default()
        } else {
            serde_json::to_string(&obj).unwrap_or_default()
        }
    }
}

/// Human-oriented formatter: `info: HTTP GET /x {"req":{..}}`
#[derive(Clone, Debug, Default)]
pub struct SimpleFormatter;

impl SimpleFormatter {
    /// Create a new simple formatter
    pub fn new() -> Self {
        Self
    }
}

impl LogFormatter for SimpleFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        let meta = meta_object(entry);
        if meta.is_empty() {
            return format!("{}: {}", entry.level, entry.message);
        }

        let meta = serde_json::to_string(&meta).unwrap_or_default();
        format!("{}: {} {}", entry.level, entry.message, meta)
    }
}

/// Logfmt log formatter (key=value pairs)
///
/// Nested metadata is flattened with dotted keys, e.g. `req.method=GET`.
#[derive(Clone, Debug, Default)]
pub struct LogfmtFormatter;

impl LogfmtFormatter {
    /// Create a new Logfmt formatter
    pub fn new() -> Self {
        Self
    }
}

impl LogFormatter for LogfmtFormatter {
    fn format(&self, entry: &LogEntry) -> String {
        let mut parts = Vec::new();

        parts.push(format!("ts={}", entry.timestamp));
        parts.push(format!("level={}", entry.level));
        parts.push(format!("msg=\"{}\"", escape_logfmt(&entry.message)));

        for (key, value) in meta_object(entry) {
            push_logfmt(&mut parts, &key, &value);
        }

        parts.join(" ")
    }
}

fn push_logfmt(parts: &mut Vec<String>, key: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (child, value) in map {
                push_logfmt(parts, &format!("{}.{}", key, child), value);
            }
        }
        Value::String(s) => parts.push(format!("{}=\"{}\"", key, escape_logfmt(s))),
        Value::Array(_) => parts.push(format!(
            "{}=\"{}\"",
            key,
            escape_logfmt(&value.to_string())
        )),
        other => parts.push(format!("{}={}", key, other)),
    }
}

/// Escape special characters for logfmt
fn escape_logfmt(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqlog_core::{ExceptionInfo, Level, Metadata};

    fn request_entry() -> LogEntry {
        let mut req = Map::new();
        req.insert("method".into(), json!("GET"));
        req.insert("url".into(), json!("/x?a=1"));
        LogEntry::new(Level::Info, "HTTP GET /x?a=1", Metadata::request(req))
    }

    #[test]
    fn test_json_formatter() {
        let line = JsonFormatter::new().format(&request_entry());
        let parsed: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["message"], "HTTP GET /x?a=1");
        assert_eq!(parsed["req"]["method"], "GET");
        assert!(parsed["timestamp"].is_u64());
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_json_formatter_pretty() {
        let line = JsonFormatter::pretty().format(&request_entry());
        assert!(line.contains('\n'));
        assert!(serde_json::from_str::<Value>(&line).is_ok());
    }

    #[test]
    fn test_json_formatter_flattens_exception() {
        let entry = LogEntry::new(
            Level::Error,
            "middlewareError",
            Metadata::exception(ExceptionInfo::capture("boom"), Map::new()),
        );
        let parsed: Value = serde_json::from_str(&JsonFormatter::new().format(&entry)).unwrap();

        assert_eq!(parsed["error"], "boom");
        assert_eq!(parsed["req"], json!({}));
        assert!(parsed["process"]["pid"].is_u64());
    }

    #[test]
    fn test_simple_formatter() {
        let line = SimpleFormatter::new().format(&request_entry());
        assert_eq!(
            line,
            r#"info: HTTP GET /x?a=1 {"req":{"method":"GET","url":"/x?a=1"}}"#
        );
    }

    #[test]
    fn test_logfmt_formatter() {
        let line = LogfmtFormatter::new().format(&request_entry());

        assert!(line.starts_with("ts="));
        assert!(line.contains("level=info"));
        assert!(line.contains(r#"msg="HTTP GET /x?a=1""#));
        assert!(line.contains(r#"req.method="GET""#));
        assert!(line.contains(r#"req.url="/x?a=1""#));
    }

    #[test]
    fn test_logfmt_escaping_and_scalars() {
        let mut req = Map::new();
        req.insert("quote".into(), json!("say \"hi\"\nbye"));
        req.insert("count".into(), json!(3));
        req.insert("list".into(), json!(["a", "b"]));
        let entry = LogEntry::new(Level::Warn, "x", Metadata::request(req));

        let line = LogfmtFormatter::new().format(&entry);
        assert!(line.contains(r#"req.quote="say \"hi\"\nbye""#));
        assert!(line.contains("req.count=3"));
        assert!(line.contains(r#"req.list="[\"a\",\"b\"]""#));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Simple ".parse::<LogFormat>().unwrap(), LogFormat::Simple);
        assert_eq!("logfmt".parse::<LogFormat>().unwrap(), LogFormat::Logfmt);
        assert_eq!(
            "xml".parse::<LogFormat>().unwrap_err(),
            ConfigError::InvalidFormat("xml".into())
        );
        assert_eq!(LogFormat::default(), LogFormat::Json);
    }
}
