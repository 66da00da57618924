//! # Handoff Agent
//!
//! Conversation orchestration for the Handoff agent dispatcher.
//!
//! The [`Orchestrator`] runs the request/response loop against a
//! [`ChatClient`]: it advertises the active agent's capabilities, executes
//! the tool calls the model requests and switches agents on handoff.
//! [`OpenAiClient`] talks to any OpenAI-compatible endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use handoff_agent::Orchestrator;
//! use handoff_core::DeveloperContext;
//!
//! let orchestrator = Orchestrator::from_env(&catalog)?;
//! let mut history = Vec::new();
//! let mut developer = DeveloperContext::new();
//! let outcome = orchestrator.run("What's the weather in Paris?", &mut history, &mut developer).await?;
//! println!("{}: {}", outcome.active_agent, outcome.content());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod types;

pub use client::{ChatClient, OpenAiClient};
pub use config::ClientConfig;
pub use error::{OrchestratorError, OrchestratorResult, TransportError, TransportResult};
pub use orchestrator::{
    Orchestrator, RunOutcome, ToolOutcome, function_not_found, handoff_notice,
};
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, FunctionDefinition, ToolDefinition,
};
