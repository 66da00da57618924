//! Argument marshalling and capability execution errors.
//!
//! None of these is recovered by the orchestrator: they abort the current
//! `run` and propagate to its caller.

use super::BoxError;
use thiserror::Error;

/// Errors raised while invoking a capability.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The arguments payload is not a JSON object.
    #[error("Malformed arguments payload: {reason}")]
    MalformedArguments { reason: String },

    /// A declared parameter has no value in the payload.
    #[error("Missing argument for parameter: {key}")]
    MissingArgument { key: String },

    /// A value could not be coerced to the declared parameter type.
    #[error("Argument '{key}' expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    /// The capability handler itself failed.
    #[error("Capability '{capability}' failed: {source}")]
    Execution {
        capability: String,
        #[source]
        source: BoxError,
    },
}

impl InvocationError {
    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            InvocationError::MalformedArguments { .. } => "MALFORMED_ARGUMENTS",
            InvocationError::MissingArgument { .. } => "MISSING_ARGUMENT",
            InvocationError::TypeMismatch { .. } => "TYPE_MISMATCH",
            InvocationError::Execution { .. } => "EXECUTION_FAILED",
        }
    }

    /// Whether the failure came from the arguments rather than the handler.
    pub fn is_marshalling(&self) -> bool {
        !matches!(self, InvocationError::Execution { .. })
    }
}

impl From<serde_json::Error> for InvocationError {
    fn from(err: serde_json::Error) -> Self {
        InvocationError::MalformedArguments {
            reason: err.to_string(),
        }
    }
}

/// Result type for capability invocation.
pub type InvocationResult<T> = Result<T, InvocationError>;
