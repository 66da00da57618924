//! Startup configuration errors.
//!
//! These errors surface while the registry is being built, before any
//! conversation starts. None of them is recoverable at runtime.

use super::BoxError;
use thiserror::Error;

/// Errors in the configuration that drives registry construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No search scope was passed and none is configured in the environment.
    #[error("Agent search scope is not configured (set HANDOFF_AGENT_SCOPE or pass a scope)")]
    MissingSearchScope,

    /// No declaration in the scope is marked as coordinator.
    #[error("No coordinator agent declared in scope '{scope}'")]
    NoCoordinator { scope: String },

    /// More than one declaration in the scope is marked as coordinator.
    #[error("Multiple coordinator agents declared in scope '{scope}': {}", .agents.join(", "))]
    MultipleCoordinators { scope: String, agents: Vec<String> },

    /// Two declarations in the same catalog share a name.
    #[error("Agent '{agent}' is declared more than once")]
    DuplicateDeclaration { agent: String },

    /// An agent constructor failed.
    #[error("Failed to construct agent '{agent}': {source}")]
    AgentConstruction {
        agent: String,
        #[source]
        source: BoxError,
    },

    /// A required environment variable is not set.
    #[error("Missing environment variable '{key}'")]
    MissingEnvVar { key: String },

    /// An environment variable holds an unusable value.
    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },
}

impl ConfigError {
    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MissingSearchScope => "MISSING_SEARCH_SCOPE",
            ConfigError::NoCoordinator { .. } => "NO_COORDINATOR",
            ConfigError::MultipleCoordinators { .. } => "MULTIPLE_COORDINATORS",
            ConfigError::DuplicateDeclaration { .. } => "DUPLICATE_DECLARATION",
            ConfigError::AgentConstruction { .. } => "AGENT_CONSTRUCTION_FAILED",
            ConfigError::MissingEnvVar { .. } => "MISSING_ENV_VAR",
            ConfigError::InvalidEnvVar { .. } => "INVALID_ENV_VAR",
        }
    }
}
