pub mod stack_trace;

pub use stack_trace::{FrameRecord, Trace};
