//! Request logging layer
//!
//! Logs `"HTTP <method> <url>"` with the filtered request as metadata to
//! every transport, then hands the request to the inner service. Transports
//! are never awaited.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqlog_core::{logger, LoggerOptions};
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(logger(LoggerOptions::new().transport(ConsoleTransport::new()))?)
//!     .service(app);
//! ```

use super::dispatch::{request_message, Dispatcher};
use crate::entry::{Level, Metadata};
use crate::error::Result;
use crate::options::LoggerOptions;
use crate::record::RequestRecord;
use http::Request;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Layer;
use tower_service::Service;

/// Build a request logging layer
///
/// Fails with [`ConfigError::MissingOptions`](crate::ConfigError) for `None`,
/// [`ConfigError::NoTransports`](crate::ConfigError) for an empty transport
/// list and [`ConfigError::InvalidLevel`](crate::ConfigError) for an unknown
/// level name.
pub fn logger(options: impl Into<Option<LoggerOptions>>) -> Result<RequestLoggerLayer> {
    RequestLoggerLayer::new(options)
}

/// Layer that logs every request before passing it on
#[derive(Clone)]
pub struct RequestLoggerLayer {
    dispatcher: Arc<Dispatcher>,
}

impl RequestLoggerLayer {
    /// Validate `options` and create the layer
    pub fn new(options: impl Into<Option<LoggerOptions>>) -> Result<Self> {
        Ok(Self {
            dispatcher: Arc::new(Dispatcher::from_options(options.into())?),
        })
    }

    /// The level requests are logged at
    pub fn level(&self) -> Level {
        self.dispatcher.level
    }

    /// Number of transports each request fans out to
    pub fn transport_count(&self) -> usize {
        self.dispatcher.transport_count()
    }

    /// Log an HTTP request without going through a tower service
    pub fn log_request<B>(&self, req: &Request<B>) {
        self.log(&RequestRecord::from_request(req));
    }

    /// Log an already built record
    ///
    /// Useful for servers that are not built on tower; the message is taken
    /// from the record's `method` and `url` fields.
    pub fn log(&self, record: &RequestRecord) {
        let meta = Metadata::request(self.dispatcher.filter(record));
        self.dispatcher
            .log(self.dispatcher.level, &request_message(record), meta);
    }
}

impl std::fmt::Debug for RequestLoggerLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLoggerLayer")
            .field("level", &self.dispatcher.level)
            .field("transports", &self.dispatcher.transport_count())
            .finish()
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogger {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service produced by [`RequestLoggerLayer`]
#[derive(Clone, Debug)]
pub struct RequestLogger<S> {
    inner: S,
    layer: RequestLoggerLayer,
}

impl<S> RequestLogger<S> {
    /// Borrow the wrapped service
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner service
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B> Service<Request<B>> for RequestLogger<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        self.layer.log_request(&req);
        self.inner.call(req)
    }
}
