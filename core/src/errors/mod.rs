mod failure;
mod panic_message;

pub use failure::{BoxError, Failure};
pub use panic_message::PanicMessage;
