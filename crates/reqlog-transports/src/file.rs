//! File transport

use crate::format::{LogFormat, LogFormatter};
use reqlog_core::{Level, LogCallback, LogEntry, Transport, TransportError, TransportResult};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Appends one formatted line per entry to a file
///
/// Lines are JSON by default, compatible with common log aggregation tools.
/// Writes are buffered; call [`flush`](Self::flush) to push them to disk.
/// The buffer is also flushed when the last clone is dropped.
///
/// [`Transport::log`] runs on the caller's thread: it takes the writer lock
/// and copies the line into the in-memory buffer, so a disk write only
/// happens when the buffer fills up. For a request path that must never
/// touch the disk, use [`TracingTransport`](crate::TracingTransport) behind
/// a non-blocking writer.
///
/// # Example
///
/// ```rust,ignore
/// use reqlog_transports::FileTransport;
///
/// let file = FileTransport::new("./requests.jsonl")?;
/// ```
#[derive(Clone)]
pub struct FileTransport {
    path: PathBuf,
    writer: Arc<Mutex<BufWriter<File>>>,
    formatter: Arc<dyn LogFormatter>,
    level: Level,
}

impl FileTransport {
    /// Create or append to the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> TransportResult<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = BufWriter::new(file);

        tracing::debug!(path = %path.display(), "opened log file");

        Ok(Self {
            path,
            writer: Arc::new(Mutex::new(writer)),
            formatter: Arc::from(LogFormat::Json.formatter()),
            level: Level::Silly,
        })
    }

    /// Use one of the built-in formats
    pub fn format(mut self, format: LogFormat) -> Self {
        self.formatter = Arc::from(format.formatter());
        self
    }

    /// Use a custom formatter
    pub fn formatter<F: LogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Least severe level that is still written
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered lines to the file
    pub fn flush(&self) -> TransportResult<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        writer.flush()?;
        Ok(())
    }

    fn write(&self, entry: &LogEntry) -> TransportResult<()> {
        if !entry.level.is_enabled_for(self.level) {
            return Ok(());
        }

        let line = self.formatter.format(entry);
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;

        writeln!(writer, "{}", line)?;
        Ok(())
    }
}

impl fmt::Debug for FileTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTransport")
            .field("path", &self.path)
            .field("level", &self.level)
            .finish()
    }
}

impl Transport for FileTransport {
    fn name(&self) -> &str {
        "file"
    }

    fn log(&self, entry: LogEntry, callback: LogCallback) {
        let result = self.write(&entry);
        if let Err(ref e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write log line");
        }
        callback(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqlog_core::{noop_callback, Metadata};
    use serde_json::{json, Map, Value};
    use tempfile::tempdir;

    fn entry(level: Level, url: &str) -> LogEntry {
        let mut req = Map::new();
        req.insert("url".into(), json!(url));
        LogEntry::new(level, format!("HTTP GET {}", url), Metadata::request(req))
    }

    #[test]
    fn test_file_transport_writes_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("requests.jsonl");

        let transport = FileTransport::new(&path).unwrap();
        transport.log(entry(Level::Info, "/a"), noop_callback());
        transport.log(entry(Level::Info, "/b"), noop_callback());
        transport.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["req"]["url"], "/a");
        assert_eq!(lines[1]["message"], "HTTP GET /b");
        assert_eq!(transport.path(), path.as_path());
    }

    #[test]
    fn test_file_transport_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("append.log");

        for url in ["/first", "/second"] {
            let transport = FileTransport::new(&path).unwrap().format(LogFormat::Simple);
            transport.log(entry(Level::Info, url), noop_callback());
            transport.flush().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("info: HTTP GET /first"));
        assert!(lines[1].starts_with("info: HTTP GET /second"));
    }

    #[test]
    fn test_file_transport_level_filter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("errors.jsonl");

        let transport = FileTransport::new(&path).unwrap().level(Level::Error);
        transport.log(entry(Level::Info, "/ignored"), noop_callback());
        transport.log(entry(Level::Error, "/kept"), noop_callback());
        transport.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("/kept"));
    }

    #[test]
    fn test_log_only_fills_the_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buffered.jsonl");
        let transport = FileTransport::new(&path).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        transport.log(
            entry(Level::Info, "/buffered"),
            Box::new(move |result| tx.send(result.is_ok()).unwrap()),
        );

        // completion is reported before `log` returns
        assert_eq!(rx.try_recv(), Ok(true));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        transport.flush().unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("/buffered"));
    }

    #[test]
    fn test_open_failure_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("nested.log");

        let err = FileTransport::new(&path).unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
    }
}
