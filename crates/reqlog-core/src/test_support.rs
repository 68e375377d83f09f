//! Transports and services shared by the unit tests

use crate::entry::{LogEntry, Metadata};
use crate::error::TransportError;
use crate::transport::{LogCallback, Transport};
use std::sync::{Arc, Mutex};

/// What a [`Recorder`] saw, in call order
#[derive(Debug, Clone)]
pub(crate) enum Call {
    Log(LogEntry),
    Exception(String, Metadata),
}

/// Records every call it receives
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    pub(crate) calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn log(&self, entry: LogEntry, callback: LogCallback) {
        self.calls.lock().unwrap().push(Call::Log(entry));
        callback(Ok(()));
    }

    fn log_exception(&self, message: &str, meta: Metadata, callback: LogCallback) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Exception(message.to_string(), meta));
        callback(Ok(()));
    }
}

/// Reports a failure for every entry
#[derive(Clone, Default)]
pub(crate) struct Failing {
    pub(crate) attempts: Arc<Mutex<usize>>,
}

impl Transport for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn log(&self, _entry: LogEntry, callback: LogCallback) {
        *self.attempts.lock().unwrap() += 1;
        callback(Err(TransportError::Unavailable("sink is down".into())));
    }
}
