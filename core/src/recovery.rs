use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::process;

use crate::errors::Failure;
use crate::mode::OutputMode;

/// Exit status used after a failure has been reported. A reported failure
/// counts as a clean exit.
pub const RECOVERED_EXIT_CODE: i32 = 0;

/// Runs `body` behind a recovery boundary using the process's output mode.
///
/// Returns normally when `body` succeeds. A returned or unwound failure is
/// reported on stdout and the process exits with [`RECOVERED_EXIT_CODE`].
/// Each thread of work needs its own boundary.
pub fn recover<F>(body: F)
where
    F: FnOnce() -> Result<(), Failure>,
{
    Recovery::new(OutputMode::current()).run(body)
}

#[derive(Debug, Clone, Copy)]
pub struct Recovery {
    mode: OutputMode,
}

impl Recovery {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn run<F>(&self, body: F)
    where
        F: FnOnce() -> Result<(), Failure>,
    {
        let Some(failure) = self.intercept(body) else {
            return;
        };

        let mut out = io::stdout().lock();
        if let Err(err) = self.report(&failure, &mut out).and_then(|()| out.flush()) {
            tracing::warn!(%err, "failed to write failure report");
        }
        tracing::debug!(mode = ?self.mode, "failure reported, exiting");
        process::exit(RECOVERED_EXIT_CODE);
    }

    /// Runs `body` and returns whatever failure escaped it, whether returned
    /// or unwound. Does not exit.
    pub fn intercept<F>(&self, body: F) -> Option<Failure>
    where
        F: FnOnce() -> Result<(), Failure>,
    {
        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(())) => None,
            Ok(Err(failure)) => Some(failure),
            Err(payload) => {
                let failure = Failure::from_panic(payload);
                tracing::debug!(error = %failure, "caught unwind");
                Some(failure)
            }
        }
    }

    pub fn report<W: Write>(&self, failure: &Failure, out: &mut W) -> io::Result<()> {
        match self.mode {
            OutputMode::Plain => writeln!(out, "{failure}"),
            OutputMode::Debug => {
                let trace = failure.trace();
                tracing::trace!(frames = trace.len(), "rendering call path");
                out.write_all(trace.render(&failure.to_string()).as_bytes())
            }
        }
    }
}
