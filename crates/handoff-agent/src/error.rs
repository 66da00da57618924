//! Error types for the chat-completion transport and the orchestration loop.

use handoff_core::error::{ConfigError, InvocationError, RegistryError};
use thiserror::Error;

/// Failures of a chat-completion round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("Chat-completion request failed: {message}")]
    Connection { message: String },

    /// The provider answered with a non-success status.
    #[error("Chat-completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not a chat completion.
    #[error("Failed to decode chat-completion response: {message}")]
    Decode { message: String },

    /// The response has no choices to read the model's turn from.
    #[error("Chat-completion response contains no choices")]
    EmptyCompletion,
}

impl TransportError {
    /// Whether retrying the same request may succeed.
    ///
    /// The orchestrator never retries; this is for callers that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Connection { .. } => true,
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::Decode { .. } | TransportError::EmptyCompletion => false,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::Connection { .. } => "CONNECTION_ERROR",
            TransportError::Status { .. } => "HTTP_STATUS_ERROR",
            TransportError::Decode { .. } => "DECODE_ERROR",
            TransportError::EmptyCompletion => "EMPTY_COMPLETION",
        }
    }
}

/// Result type for chat-completion calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Any error that aborts a conversation run or its setup.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OrchestratorError {
    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrchestratorError::Invocation(err) => err.error_code(),
            OrchestratorError::Transport(err) => err.error_code(),
            OrchestratorError::Registry(err) => err.error_code(),
            OrchestratorError::Config(err) => err.error_code(),
        }
    }
}

/// Result type for orchestration.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
