//! Agent handles.
//!
//! An [`Agent`] is a persona: a model identifier, the instructions sent as
//! the system prompt while it is active, and the description advertised to
//! other agents in its "transfer to" capability. Agents are created once by
//! the registry and never mutated afterwards, so the handle is a cheap
//! `Arc` clone that can be moved between turns and conversations.

use crate::identifiers::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Model used when a declaration does not name one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Whether an agent starts conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// The single entry-point agent of every conversation.
    Coordinator,
    /// Any other agent, reachable through a handoff.
    Member,
}

/// Immutable metadata describing an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Display name, also used when composing capability names.
    pub name: String,
    /// Model identifier sent with every request while the agent is active.
    pub model: String,
    /// System prompt used while the agent is active.
    pub instructions: String,
    /// Description of when to hand off to this agent.
    pub description: String,
    pub role: AgentRole,
}

impl AgentProfile {
    /// Create a profile with the default model and empty prompts.
    pub fn new(name: impl Into<String>, role: AgentRole) -> Self {
        Self {
            name: name.into(),
            model: DEFAULT_MODEL.to_string(),
            instructions: String::new(),
            description: String::new(),
            role,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_coordinator(&self) -> bool {
        self.role == AgentRole::Coordinator
    }
}

#[derive(Debug)]
struct AgentInner {
    id: AgentId,
    profile: AgentProfile,
}

/// Shared handle to a registered agent.
///
/// Equality and hashing use the [`AgentId`] only.
#[derive(Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

impl Agent {
    /// Create a handle for a profile registered under `id`.
    pub fn new(id: AgentId, profile: AgentProfile) -> Self {
        Self {
            inner: Arc::new(AgentInner { id, profile }),
        }
    }

    pub fn id(&self) -> AgentId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.profile.name
    }

    pub fn model(&self) -> &str {
        &self.inner.profile.model
    }

    pub fn instructions(&self) -> &str {
        &self.inner.profile.instructions
    }

    pub fn description(&self) -> &str {
        &self.inner.profile.description
    }

    pub fn role(&self) -> AgentRole {
        self.inner.profile.role
    }

    pub fn is_coordinator(&self) -> bool {
        self.inner.profile.is_coordinator()
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.inner.profile
    }
}

impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Agent {}

impl std::hash::Hash for Agent {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.inner.id)
            .field("name", &self.inner.profile.name)
            .field("model", &self.inner.profile.model)
            .field("role", &self.inner.profile.role)
            .finish()
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.profile.name)
    }
}
