//! # Handoff
//!
//! Handoff dispatches a tool-calling LLM conversation across a team of
//! agents. Each agent has its own model, instructions and capabilities; any
//! agent can hand the conversation to another through an automatically
//! generated "transfer to" capability.
//!
//! ## Core Components
//!
//! - **[AgentDeclaration]**, **[AgentCatalog]**: explicit agent registration
//! - **[CapabilityRegistry]**: discovery within a search scope, naming and
//!   visibility of capabilities
//! - **[invoke]**: argument marshalling and execution of one capability
//! - **[Orchestrator]**: the conversation loop over a [`ChatClient`]
//!
//! ## Quick Start
//!
//! ```rust
//! use handoff::{AgentCatalog, AgentDeclaration, CapabilityRegistry, Member, Param};
//!
//! struct Desk;
//! struct Weather;
//!
//! let catalog = AgentCatalog::new()
//!     .with(
//!         AgentDeclaration::coordinator::<Desk>("Desk", "app::agents")
//!             .instructions("Route requests.")
//!             .construct_with(|| Ok(Desk))
//!             .build(),
//!     )?
//!     .with(
//!         AgentDeclaration::agent::<Weather>("Weather", "app::agents::weather")
//!             .description("Ask me about the weather")
//!             .construct_with(|| Ok(Weather))
//!             .capability(
//!                 Member::new("forecast", "Forecast for a city").param(Param::of::<String>()),
//!                 |_, frame| Ok(format!("Sunny in {}", frame.arg::<String>(0)?).into()),
//!             )
//!             .build(),
//!     )?;
//!
//! let registry = CapabilityRegistry::build(&catalog, Some("app::agents"))?;
//! let weather = registry.agent("Weather").unwrap();
//! assert!(registry.capability("1_Weather_forecast", weather).is_some());
//! assert!(registry.capability("1_Weather_transfer_to_agent", registry.coordinator()).is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use handoff_agent as agent;
pub use handoff_core as core;
pub use handoff_tools as tools;

pub use handoff_agent::{
    ChatClient, ClientConfig, OpenAiClient, Orchestrator, OrchestratorError, OrchestratorResult,
    RunOutcome, TransportError,
};
pub use handoff_core::{
    Agent, AgentId, AssistantMessage, CapabilityName, ChatMessage, ConversationContext,
    DeveloperContext, Describe, Param, ParamType, ToolCall,
};
pub use handoff_tools::{
    AgentCatalog, AgentDeclaration, CallFrame, Capability, CapabilityOutput, CapabilityRegistry,
    CapabilityScope, Member, SCOPE_ENV_VAR, invoke,
};
