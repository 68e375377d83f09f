//! Diagnostics gathered for error logs

use crate::entry::unix_millis;
use serde::Serialize;
use std::error::Error;
use std::ffi::OsString;
use std::fmt;
use std::time::SystemTime;

/// Everything known about an error at the moment it is logged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionInfo {
    /// Milliseconds since the Unix epoch
    pub date: u64,
    /// `Display` of the error
    pub error: String,
    /// `Debug` of the error
    pub debug: String,
    /// The error followed by each of its sources, outermost first
    pub stack: Vec<String>,
    /// The current process
    pub process: ProcessInfo,
    /// The host operating system
    pub os: OsInfo,
}

/// Process details at capture time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    pub cwd: Option<String>,
    pub exec_path: Option<String>,
    pub argv: Vec<String>,
}

/// Host details at capture time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsInfo {
    pub family: String,
    pub os: String,
    pub arch: String,
}

impl ExceptionInfo {
    /// Capture diagnostics from any displayable error value
    pub fn capture<E>(err: &E) -> Self
    where
        E: fmt::Display + fmt::Debug + ?Sized,
    {
        let error = err.to_string();
        Self {
            date: unix_millis(SystemTime::now()),
            stack: vec![error.clone()],
            error,
            debug: format!("{:?}", err),
            process: ProcessInfo::current(),
            os: OsInfo::current(),
        }
    }

    /// Capture diagnostics including the `source()` chain
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut info = Self::capture(err);
        let mut source = err.source();
        while let Some(cause) = source {
            info.stack.push(cause.to_string());
            source = cause.source();
        }
        info
    }
}

impl ProcessInfo {
    fn current() -> Self {
        Self {
            pid: std::process::id(),
            cwd: std::env::current_dir()
                .ok()
                .map(|p| p.display().to_string()),
            exec_path: std::env::current_exe()
                .ok()
                .map(|p| p.display().to_string()),
            argv: lossy_args(std::env::args_os()),
        }
    }
}

/// Arguments as strings, with invalid UTF-8 replaced rather than panicking
fn lossy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

impl OsInfo {
    fn current() -> Self {
        Self {
            family: std::env::consts::FAMILY.to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}
