//! # reqlog transports
//!
//! Ready-made sinks for the reqlog middleware.
//!
//! ## Feature Flags
//!
//! - `http` - [`HttpTransport`], POSTs entries to a collector (reqwest)
//! - `config` - `REQLOG_*` environment configuration (dotenvy, envy)
//! - `full` - everything above
//!
//! The memory, console, file and tracing transports are always available.
//!
//! ## Example
//!
//! ```rust,ignore
//! use reqlog_core::{logger, Level, LoggerOptions};
//! use reqlog_transports::{ConsoleTransport, FileTransport, LogFormat};
//!
//! let options = LoggerOptions::new()
//!     .transport(ConsoleTransport::new().format(LogFormat::Simple))
//!     .transport(FileTransport::new("requests.jsonl")?.level(Level::Warn));
//! let layer = logger(options)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod console;
mod file;
mod format;
mod memory;
mod tracing_transport;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "config")]
pub mod config;

pub use console::{ConsoleTransport, Stream};
pub use file::FileTransport;
pub use format::{JsonFormatter, LogFormat, LogFormatter, LogfmtFormatter, SimpleFormatter};
pub use memory::{MemoryTransport, MemoryTransportConfig};
pub use tracing_transport::{tracing_level, TracingTransport};

#[cfg(feature = "http")]
pub use http::{HttpTransport, HttpTransportConfig};

#[cfg(feature = "config")]
pub use config::{load_dotenv, load_dotenv_from, LoggerSettings, SettingsError};
