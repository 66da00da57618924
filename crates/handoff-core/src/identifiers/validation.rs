//! Capability name validation rules

use thiserror::Error;

/// Maximum length of a capability name.
///
/// Chat-completion providers reject function names longer than this.
pub const MAX_NAME_LENGTH: usize = 64;

/// Error type for capability name validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameValidationError {
    /// The name is empty
    #[error("Name cannot be empty")]
    Empty,
    /// The name exceeds the maximum length
    #[error("Name too long ({length} chars, max {max})")]
    TooLong { length: usize, max: usize },
    /// The name contains a character outside `[A-Za-z0-9_-]`
    #[error("Name contains invalid character '{character}' (allowed: ASCII alphanumerics, '_' and '-')")]
    InvalidCharacter { character: char },
}

/// Validator for names advertised to the model as tool names
pub struct NameValidator;

impl NameValidator {
    /// Validate a name according to the tool-name rules
    ///
    /// # Validation Rules
    ///
    /// - Non-empty
    /// - At most 64 characters
    /// - Only ASCII alphanumerics, underscores (`_`) and hyphens (`-`)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use handoff_core::identifiers::NameValidator;
    ///
    /// assert!(NameValidator::validate("0_WeatherMan_get_weather").is_ok());
    /// assert!(NameValidator::validate("get-weather").is_ok());
    ///
    /// assert!(NameValidator::validate("").is_err());
    /// assert!(NameValidator::validate("get weather").is_err());
    /// assert!(NameValidator::validate("weather.get").is_err());
    /// ```
    pub fn validate(name: &str) -> Result<&str, NameValidationError> {
        if name.is_empty() {
            return Err(NameValidationError::Empty);
        }

        if name.len() > MAX_NAME_LENGTH {
            return Err(NameValidationError::TooLong {
                length: name.len(),
                max: MAX_NAME_LENGTH,
            });
        }

        if let Some(character) = name.chars().find(|c| !Self::is_valid_char(*c)) {
            return Err(NameValidationError::InvalidCharacter { character });
        }

        Ok(name)
    }

    /// Check if a character is valid in a name
    pub fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '-'
    }
}
