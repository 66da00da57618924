//! # Handoff Core
//!
//! Core types for the Handoff agent dispatcher.
//! This crate provides the building blocks shared by the registry, the
//! invoker and the orchestrator: identifiers, agent handles, chat messages,
//! the conversation context, parameter schemas and argument coercion.

pub mod agent;
pub mod context;
pub mod error;
pub mod identifiers;
pub mod message;
pub mod schema;
pub mod value;

pub use agent::{Agent, AgentProfile, AgentRole, DEFAULT_MODEL};
pub use context::{ConversationContext, DeveloperContext};
pub use error::{
    BoxError, ConfigError, InvocationError, InvocationResult, RegistrationError, RegistryError,
    RegistryResult,
};
pub use identifiers::{AgentId, CapabilityName, NameValidationError};
pub use message::{AssistantMessage, ChatMessage, FunctionCall, Role, ToolCall};
pub use schema::{Describe, Param, ParamKind, ParamType, argument_key, parameters_schema};
pub use value::coerce;
