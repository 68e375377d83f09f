//! Error logging layer
//!
//! Wraps a service and, whenever it resolves to `Err`, reports the error
//! together with the filtered request to every transport before returning
//! the very same error to the caller.

use super::dispatch::Dispatcher;
use crate::entry::Metadata;
use crate::error::Result;
use crate::exception::ExceptionInfo;
use crate::options::LoggerOptions;
use crate::record::RequestRecord;
use http::Request;
use pin_project_lite::pin_project;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tower::Layer;
use tower_service::Service;

/// Build an error logging layer
///
/// Validation is the same as for [`logger`](crate::logger). The `level`
/// option is validated but unused: errors are always reported through
/// [`Transport::log_exception`](crate::Transport::log_exception).
pub fn error_logger(options: impl Into<Option<LoggerOptions>>) -> Result<ErrorLoggerLayer> {
    ErrorLoggerLayer::new(options)
}

/// Layer that reports failed requests
#[derive(Clone)]
pub struct ErrorLoggerLayer {
    dispatcher: Arc<Dispatcher>,
}

impl ErrorLoggerLayer {
    /// Validate `options` and create the layer
    pub fn new(options: impl Into<Option<LoggerOptions>>) -> Result<Self> {
        Ok(Self {
            dispatcher: Arc::new(Dispatcher::from_options(options.into())?),
        })
    }

    /// Number of transports each error fans out to
    pub fn transport_count(&self) -> usize {
        self.dispatcher.transport_count()
    }

    /// Report an error for `record`
    pub fn log<E>(&self, err: &E, record: &RequestRecord)
    where
        E: fmt::Display + fmt::Debug + ?Sized,
    {
        self.report(ExceptionInfo::capture(err), record);
    }

    /// Report an error for `record`, including its `source()` chain
    pub fn log_error(&self, err: &(dyn std::error::Error + 'static), record: &RequestRecord) {
        self.report(ExceptionInfo::from_error(err), record);
    }

    fn report(&self, exception: ExceptionInfo, record: &RequestRecord) {
        let meta = Metadata::exception(exception, self.dispatcher.filter(record));
        self.dispatcher.log_exception(meta);
    }
}

impl fmt::Debug for ErrorLoggerLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorLoggerLayer")
            .field("transports", &self.dispatcher.transport_count())
            .finish()
    }
}

impl<S> Layer<S> for ErrorLoggerLayer {
    type Service = ErrorLogger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorLogger {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service produced by [`ErrorLoggerLayer`]
#[derive(Clone, Debug)]
pub struct ErrorLogger<S> {
    inner: S,
    layer: ErrorLoggerLayer,
}

impl<S> ErrorLogger<S> {
    /// Borrow the wrapped service
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner service
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B> Service<Request<B>> for ErrorLogger<S>
where
    S: Service<Request<B>>,
    S::Error: fmt::Display + fmt::Debug,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ErrorLoggerFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // The request is moved into the inner service, so the record is taken now.
        let record = RequestRecord::from_request(&req);
        ErrorLoggerFuture {
            inner: self.inner.call(req),
            record: Some(record),
            layer: self.layer.clone(),
        }
    }
}

pin_project! {
    /// Response future of [`ErrorLogger`]
    pub struct ErrorLoggerFuture<F> {
        #[pin]
        inner: F,
        record: Option<RequestRecord>,
        layer: ErrorLoggerLayer,
    }
}

impl<F, T, E> Future for ErrorLoggerFuture<F>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: fmt::Display + fmt::Debug,
{
    type Output = std::result::Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));

        if let Err(err) = &result {
            if let Some(record) = this.record.take() {
                this.layer.log(err, &record);
            }
        }

        Poll::Ready(result)
    }
}
