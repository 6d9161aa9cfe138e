use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown record kind: {0}")]
    UnknownRecordKind(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}
