//! Error short-circuiting with a single top-level recovery boundary.
//!
//! [`check`] and [`must`] turn an error into a [`Failure`] that travels up
//! with `?` (or unwinds via [`Failure::raise`]). [`recover`] catches it,
//! prints the message (or a call path under `--debug`/`-d`) and exits with
//! status 0.

pub mod diagnostics;
pub mod errors;
pub mod guard;
pub mod mode;
pub mod recovery;

pub use diagnostics::{FrameRecord, Trace};
pub use errors::{BoxError, Failure};
pub use guard::{MustExt, check, check_result, must};
pub use mode::OutputMode;
pub use recovery::{Recovery, recover};
