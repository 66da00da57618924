//! Identifier types for agents and capabilities
//!
//! Agents are identified by an [`AgentId`], an ordinal assigned by the
//! registry in registration order. Capabilities are identified by a
//! [`CapabilityName`], composed from the owning agent's id, the agent name
//! and the member name:
//!
//! ```text
//! <agent ordinal>_<agent name>_<member name>
//! ```
//!
//! Because the ordinal is assigned explicitly and never reused within a
//! registry, two agents that declare a member with the same name always end
//! up with distinct capability names.
//!
//! # Examples
//!
//! ```rust
//! use handoff_core::identifiers::{AgentId, CapabilityName};
//!
//! let id = AgentId::new(2);
//! let name = CapabilityName::compose(id, "WeatherMan", "get_weather").unwrap();
//! assert_eq!(name.as_str(), "2_WeatherMan_get_weather");
//!
//! // Names must be usable as tool names
//! assert!(CapabilityName::parse("get weather").is_err());
//! ```

mod validation;

pub use validation::{MAX_NAME_LENGTH, NameValidationError, NameValidator};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of an agent within a registry
///
/// The id is the agent's registration ordinal: the coordinator is always
/// `0`, the remaining agents follow in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u32);

impl AgentId {
    /// Create an agent id from its registration ordinal
    pub const fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    /// The registration ordinal
    pub const fn ordinal(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique, validated name of a capability
///
/// This is the name advertised to the model as the tool's function name
/// and the key the model uses to invoke it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Parse and validate a capability name
    pub fn parse(name: impl AsRef<str>) -> Result<Self, NameValidationError> {
        NameValidator::validate(name.as_ref()).map(|s| Self(s.to_string()))
    }

    /// Compose the name of a capability owned by an agent
    pub fn compose(
        owner: AgentId,
        owner_name: &str,
        member: &str,
    ) -> Result<Self, NameValidationError> {
        Self::parse(format!("{}_{}_{}", owner, owner_name, member))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a name without validation (for testing only)
    #[doc(hidden)]
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CapabilityName {
    type Err = NameValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<CapabilityName> for String {
    fn from(name: CapabilityName) -> Self {
        name.0
    }
}

impl TryFrom<String> for CapabilityName {
    type Error = NameValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<str> for CapabilityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for CapabilityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}
