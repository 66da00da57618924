//! The conversation loop.
//!
//! A run starts with the coordinator active. Each turn sends the active
//! agent's instructions, the whole history and the agent's capabilities to
//! the model, then executes the tool calls of the model's reply in order.
//! A capability returning an agent switches the active agent for the next
//! calls and turns. The run ends at the first reply without tool calls.
//!
//! ```text
//!            +-------------+   no tool calls   +------+
//!  prompt -> | AWAIT_MODEL | ----------------> | DONE |
//!            +-------------+                   +------+
//!               ^       | tool calls
//!               |       v
//!            +----------------+
//!            | DISPATCH_TOOLS |
//!            +----------------+
//! ```
//!
//! A tool name that does not resolve for the active agent is answered with
//! a "Function not found" tool message and the loop continues. Every other
//! failure aborts the run and leaves the history as it was at that point.

use crate::client::{ChatClient, OpenAiClient};
use crate::config::ClientConfig;
use crate::error::OrchestratorResult;
use crate::types::{ChatCompletionRequest, ToolDefinition};
use handoff_core::{
    Agent, AssistantMessage, ChatMessage, ConversationContext, DeveloperContext, ToolCall,
};
use handoff_tools::{AgentCatalog, CapabilityOutput, CapabilityRegistry, invoke};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tool response content for a name that does not resolve.
pub fn function_not_found(name: &str) -> String {
    format!("Function not found: {name}")
}

/// Tool response content announcing a handoff.
pub fn handoff_notice(agent: &Agent) -> String {
    format!(
        "Transferred to agent {}. Adopt this persona immediately.",
        agent.name()
    )
}

/// Result of dispatching one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    /// Content of the tool response message.
    pub content: String,
    /// Agent to switch to, if the call was a handoff.
    pub next_agent: Option<Agent>,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome<'a> {
    /// The model's final reply.
    pub reply: AssistantMessage,
    /// Agent active when the run ended.
    pub active_agent: Agent,
    /// Number of model round trips.
    pub turns: usize,
    pub history: &'a [ChatMessage],
    pub developer_context: &'a DeveloperContext,
}

impl RunOutcome<'_> {
    /// Text of the final reply.
    pub fn content(&self) -> &str {
        self.reply.content_text()
    }
}

/// Drives conversations over a capability registry.
///
/// The orchestrator holds no per-conversation state. Independent
/// conversations can share it, each with its own history.
#[derive(Clone)]
pub struct Orchestrator {
    client: Arc<dyn ChatClient>,
    registry: Arc<CapabilityRegistry>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry.scope())
            .field("agents", &self.registry.agents().len())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        client: impl ChatClient + 'static,
        registry: impl Into<Arc<CapabilityRegistry>>,
    ) -> Self {
        Self {
            client: Arc::new(client),
            registry: registry.into(),
        }
    }

    /// Build the registry from `catalog` and an HTTP client, both configured
    /// from the environment.
    pub fn from_env(catalog: &AgentCatalog) -> OrchestratorResult<Self> {
        let registry = CapabilityRegistry::build(catalog, None)?;
        let config = ClientConfig::from_env()?;
        let client = OpenAiClient::new(&config)?;
        Ok(Self::new(client, registry))
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Request for the next model turn while `agent` is active.
    pub fn build_request(&self, agent: &Agent, history: &[ChatMessage]) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(agent.instructions()));
        messages.extend_from_slice(history);

        let tools: Vec<ToolDefinition> = self
            .registry
            .capabilities_for(agent)
            .into_iter()
            .map(ToolDefinition::from)
            .collect();

        ChatCompletionRequest {
            model: agent.model().to_string(),
            messages,
            tools,
        }
    }

    /// Execute one tool call on behalf of `agent`.
    pub fn dispatch(
        &self,
        agent: &Agent,
        call: &ToolCall,
        history: &mut Vec<ChatMessage>,
        developer: &mut DeveloperContext,
    ) -> OrchestratorResult<ToolOutcome> {
        let Some(capability) = self.registry.capability(call.name(), agent) else {
            warn!(
                function = %call.name(),
                agent = %agent,
                "Model requested a function that is not available"
            );
            return Ok(ToolOutcome {
                content: function_not_found(call.name()),
                next_agent: None,
            });
        };

        debug!(
            function = %call.name(),
            call_id = %call.id,
            agent = %agent,
            "Dispatching tool call"
        );
        let output = invoke(
            capability,
            ConversationContext::new(history, developer),
            call.arguments(),
        )?;

        Ok(match output {
            CapabilityOutput::Handoff(next) => ToolOutcome {
                content: handoff_notice(&next),
                next_agent: Some(next),
            },
            value => ToolOutcome {
                content: value.to_content(),
                next_agent: None,
            },
        })
    }

    /// Run one user prompt to completion.
    ///
    /// The prompt, every model turn and every tool response are appended to
    /// `history`. Capabilities may read and change both `history` and
    /// `developer` while the run is in progress.
    pub async fn run<'a>(
        &self,
        prompt: &str,
        history: &'a mut Vec<ChatMessage>,
        developer: &'a mut DeveloperContext,
    ) -> OrchestratorResult<RunOutcome<'a>> {
        history.push(ChatMessage::user(prompt));
        let mut active = self.registry.coordinator().clone();
        let mut turns = 0;

        loop {
            let request = self.build_request(&active, history);
            let reply = self.client.complete(&request).await?.into_message()?;
            turns += 1;
            history.push(ChatMessage::Assistant(reply.clone()));

            if !reply.has_tool_calls() {
                info!(
                    agent = %active,
                    turns,
                    history = history.len(),
                    "Run completed"
                );
                return Ok(RunOutcome {
                    reply,
                    active_agent: active,
                    turns,
                    history,
                    developer_context: developer,
                });
            }

            debug!(
                agent = %active,
                tool_calls = reply.tool_calls.len(),
                "Model requested tool calls"
            );
            for call in &reply.tool_calls {
                let outcome = self.dispatch(&active, call, history, developer)?;
                if let Some(next) = outcome.next_agent {
                    info!(from = %active, to = %next, "Handing off conversation");
                    active = next;
                }
                history.push(ChatMessage::tool(call.id.clone(), outcome.content));
            }
        }
    }
}
