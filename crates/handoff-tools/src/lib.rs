//! # Handoff Tools
//!
//! This crate turns agent declarations into callable capabilities:
//!
//! - **Declarations** (`declaration`): typed builders describing an agent, its
//!   constructor and its members, collected in an [`AgentCatalog`]
//! - **Registry** (`registry`): discovery, coordinator validation, naming and
//!   scoped storage of capabilities
//! - **Invoker** (`invoker`): argument marshalling and execution

/// Capability model: scope, target, arguments and output.
pub mod capability;
/// Agent declarations and the catalog they are discovered from.
pub mod declaration;
/// Argument marshalling and capability execution.
pub mod invoker;
/// Capability registry built from a catalog.
pub mod registry;

pub use capability::{
    Arguments, CallFrame, Capability, CapabilityOutput, CapabilityScope, CapabilityTarget, Handler,
};
pub use declaration::{AgentCatalog, AgentDeclaration, AgentDeclarationBuilder, Member};
pub use invoker::{invoke, marshal_arguments};
pub use registry::{CapabilityRegistry, HANDOFF_MEMBER, SCOPE_ENV_VAR};
