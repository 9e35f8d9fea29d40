use std::any::Any;

use miette::Diagnostic;
use thiserror::Error;

/// A panic that reached a recovery boundary without a `Failure` payload.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(rr::panic))]
pub struct PanicMessage {
    pub message: String,
}

impl PanicMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        if let Some(msg) = payload.downcast_ref::<&str>() {
            return Self::new(*msg);
        }
        if let Some(msg) = payload.downcast_ref::<String>() {
            return Self::new(msg.as_str());
        }
        Self::new("panic")
    }
}
