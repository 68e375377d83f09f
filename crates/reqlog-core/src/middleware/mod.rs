//! Tower middleware for request and error logging
//!
//! Both layers are built by a fallible factory so misconfiguration is
//! caught while the service stack is assembled, never per request.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqlog_core::{error_logger, logger, LoggerOptions};
//! use tower::ServiceBuilder;
//!
//! let options = LoggerOptions::new().transport(ConsoleTransport::new());
//!
//! let service = ServiceBuilder::new()
//!     .layer(logger(options.clone())?)
//!     .layer(error_logger(options)?)
//!     .service(app);
//! ```

mod dispatch;
mod error_logger;
mod request_logger;

pub use dispatch::EXCEPTION_MESSAGE;
pub use error_logger::{error_logger, ErrorLogger, ErrorLoggerFuture, ErrorLoggerLayer};
pub use request_logger::{logger, RequestLogger, RequestLoggerLayer};
