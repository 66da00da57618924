//! # Handoff Testing
//!
//! Test doubles and fixtures for exercising the orchestrator without a
//! chat-completion provider.
//!
//! - **Scripted client**: a [`ChatClient`](handoff_agent::ChatClient) that
//!   replays queued completions and records every request
//! - **Fixtures**: builders for completions, tool calls and a small agent catalog
//!
//! ## Usage
//!
//! ```rust
//! use handoff_testing::{ScriptedChatClient, fixtures};
//!
//! let client = ScriptedChatClient::new()
//!     .then_tool_calls(vec![fixtures::tool_call("0_Coordinator_transfer_to_agent", "{}")])
//!     .then_text("ok");
//! assert_eq!(client.remaining(), 2);
//! ```

/// Completion, tool-call and catalog fixtures
pub mod fixtures;
/// Chat client replaying scripted completions
pub mod scripted_client;

pub use scripted_client::ScriptedChatClient;
