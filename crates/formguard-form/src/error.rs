// File: src/error.rs
// Purpose: Controller construction and submission errors

use thiserror::Error;

/// Failure while building a controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Only raised with `validation.strict_rules` enabled.
    #[error("field `{field}` uses unknown rule `{rule}`")]
    UnknownRule { field: String, rule: String },
}

/// Failure of a submit listener. Reported through error listeners; the
/// controller always returns to idle afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submit listener failed: {0}")]
    Listener(String),

    #[error("submit listener panicked: {0}")]
    Panicked(String),
}

impl SubmitError {
    pub fn listener(message: impl Into<String>) -> Self {
        SubmitError::Listener(message.into())
    }
}

impl From<anyhow::Error> for SubmitError {
    fn from(err: anyhow::Error) -> Self {
        SubmitError::Listener(format!("{:#}", err))
    }
}
