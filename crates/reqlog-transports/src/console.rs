//! Console transport

use crate::format::{LogFormat, LogFormatter};
use reqlog_core::{Level, LogCallback, LogEntry, Transport, TransportError};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Output stream for a console line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stream {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// Writes one formatted line per entry to stdout
///
/// Entries less severe than the configured level are skipped; levels listed
/// with [`stderr_levels`](Self::stderr_levels) go to stderr instead.
///
/// Lines are written on the caller's thread while holding the stream lock,
/// so a slow terminal or a full pipe slows the request that logged. Prefer
/// [`TracingTransport`](crate::TracingTransport) with a non-blocking
/// subscriber for high-volume services.
///
/// # Example
///
/// ```rust
/// use reqlog_transports::{ConsoleTransport, LogFormat};
/// use reqlog_core::Level;
///
/// let console = ConsoleTransport::new()
///     .format(LogFormat::Simple)
///     .level(Level::Http)
///     .stderr_levels([Level::Error, Level::Warn]);
/// ```
#[derive(Clone)]
pub struct ConsoleTransport {
    format: LogFormat,
    formatter: Arc<dyn LogFormatter>,
    level: Level,
    stderr_levels: Vec<Level>,
}

impl ConsoleTransport {
    /// JSON lines on stdout, every level enabled
    pub fn new() -> Self {
        Self {
            format: LogFormat::Json,
            formatter: Arc::from(LogFormat::Json.formatter()),
            level: Level::Silly,
            stderr_levels: Vec::new(),
        }
    }

    /// Use one of the built-in formats
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
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

    /// Levels written to stderr
    pub fn stderr_levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.stderr_levels = levels.into_iter().collect();
        self
    }

    /// Where `entry` goes and what is written, `None` when it is filtered out
    pub fn render(&self, entry: &LogEntry) -> Option<(Stream, String)> {
        if !entry.level.is_enabled_for(self.level) {
            return None;
        }

        let stream = if self.stderr_levels.contains(&entry.level) {
            Stream::Stderr
        } else {
            Stream::Stdout
        };
        Some((stream, self.formatter.format(entry)))
    }

    fn write(&self, entry: &LogEntry) -> Result<(), TransportError> {
        let Some((stream, line)) = self.render(entry) else {
            return Ok(());
        };

        match stream {
            Stream::Stdout => writeln!(std::io::stdout().lock(), "{}", line)?,
            Stream::Stderr => writeln!(std::io::stderr().lock(), "{}", line)?,
        }
        Ok(())
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConsoleTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleTransport")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("stderr_levels", &self.stderr_levels)
            .finish()
    }
}

impl Transport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    fn log(&self, entry: LogEntry, callback: LogCallback) {
        callback(self.write(&entry));
    }
}
