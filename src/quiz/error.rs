use thiserror::Error;

use super::session::SessionStatus;

/// Reasons an untrusted question payload is refused.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Payload is not a sequence, or does not hold exactly the quiz length
    #[error("Expected a list of {expected} questions, got {found}")]
    Shape { expected: usize, found: String },

    #[error("Question {index}: expected {expected} options, got {found}")]
    OptionCount {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Question {index}: correct option index must be an integer between 0 and {max}")]
    IndexRange { index: usize, max: usize },

    #[error("Question {index}: missing or empty field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Question {index}: options must be distinct")]
    DuplicateOption { index: usize },

    #[error("Question {index}: id is already used by another question")]
    DuplicateId { index: usize },

    /// Raw model output that is not JSON at all
    #[error("Malformed question payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ValidationError {
    /// Position of the offending question, if the error concerns one.
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::OptionCount { index, .. }
            | ValidationError::IndexRange { index, .. }
            | ValidationError::MissingField { index, .. }
            | ValidationError::DuplicateOption { index }
            | ValidationError::DuplicateId { index } => Some(*index),
            ValidationError::Shape { .. } | ValidationError::Malformed(_) => None,
        }
    }
}

/// Contract violations raised by a quiz session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {operation} while session is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    #[error("{what} {value} is out of range (must be below {bound})")]
    Range {
        what: &'static str,
        value: usize,
        bound: usize,
    },

    #[error("Time limit must be at least one second")]
    ZeroTimeLimit,
}

pub type ValidationResult<T> = Result<T, ValidationError>;
pub type SessionResult<T> = Result<T, SessionError>;
