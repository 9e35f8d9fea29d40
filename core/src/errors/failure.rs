use std::any::Any;
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::panic;

use miette::Diagnostic;

use super::PanicMessage;
use crate::diagnostics::Trace;

pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A checked error on its way to the nearest recovery boundary.
///
/// Displays exactly as the wrapped error does. The call stack is captured
/// when the failure is created, in every output mode, so the unwinding cost
/// is paid up front even when the report is plain. Symbolization waits until
/// a report asks for its [`Trace`].
#[derive(Debug, Diagnostic)]
#[diagnostic(code(rr::check))]
pub struct Failure {
    error: BoxError,
    backtrace: Backtrace,
}

impl Failure {
    pub fn new(error: impl Into<BoxError>) -> Self {
        let backtrace = Backtrace::force_capture();
        Self {
            error: error.into(),
            backtrace,
        }
    }

    /// Rebuilds a failure from a caught unwind payload. Payloads that are not
    /// a `Failure` become a [`PanicMessage`] with no call stack.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<Failure>() {
            Ok(failure) => *failure,
            Err(payload) => Self {
                error: Box::new(PanicMessage::from_payload(payload.as_ref())),
                backtrace: Backtrace::disabled(),
            },
        }
    }

    /// Unwinds to the nearest recovery boundary with `self` as the payload.
    /// The panic hook does not run.
    pub fn raise(self) -> ! {
        tracing::trace!(error = %self, "unwinding to recovery boundary");
        panic::resume_unwind(Box::new(self))
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn into_inner(self) -> BoxError {
        self.error
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn trace(&self) -> Trace {
        Trace::from_backtrace(&self.backtrace)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}
