//! Capability registration errors.

use super::ConfigError;
use crate::identifiers::NameValidationError;
use thiserror::Error;

/// Errors raised while registering an agent's capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A capability with this name is already registered in the same scope.
    #[error("Capability already registered: {name}")]
    DuplicateCapability { name: String },

    /// The context parameter is repeated or not in first position.
    #[error(
        "Capability '{capability}' may declare a single context parameter, and it must be the first parameter"
    )]
    ContextParameterOrder { capability: String },

    /// The composed capability name is not a valid tool name.
    #[error("Invalid capability name '{name}': {reason}")]
    InvalidName {
        name: String,
        #[source]
        reason: NameValidationError,
    },
}

/// Any error that aborts registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl RegistryError {
    /// Whether this is a configuration (rather than registration) error.
    pub fn is_config(&self) -> bool {
        matches!(self, RegistryError::Config(_))
    }

    /// Get the error code suitable for logging or reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::Config(err) => err.error_code(),
            RegistryError::Registration(RegistrationError::DuplicateCapability { .. }) => {
                "DUPLICATE_CAPABILITY"
            }
            RegistryError::Registration(RegistrationError::ContextParameterOrder { .. }) => {
                "CONTEXT_PARAMETER_ORDER"
            }
            RegistryError::Registration(RegistrationError::InvalidName { .. }) => "INVALID_NAME",
        }
    }
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;
