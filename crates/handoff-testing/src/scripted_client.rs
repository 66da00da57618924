//! # Scripted Chat Client
//!
//! A [`ChatClient`] that returns predefined completions in order, allowing
//! orchestrator runs to be tested turn by turn.

use crate::fixtures;
use async_trait::async_trait;
use handoff_agent::{ChatClient, ChatCompletionRequest, ChatCompletionResponse, TransportError};
use handoff_core::{AssistantMessage, ToolCall};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Scripted = Result<ChatCompletionResponse, TransportError>;

/// Replays queued completions and records every request it receives.
///
/// Clones share the same script and request log, so a clone can be handed
/// to the orchestrator while the original is kept for assertions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChatClient {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl ScriptedChatClient {
    /// Create a client with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a full response
    pub fn then_response(self, response: ChatCompletionResponse) -> Self {
        self.script.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue an assistant turn
    pub fn then_reply(self, message: AssistantMessage) -> Self {
        self.then_response(fixtures::completion(message))
    }

    /// Queue a final text answer
    pub fn then_text(self, content: impl Into<String>) -> Self {
        self.then_reply(AssistantMessage::text(content))
    }

    /// Queue a turn requesting tool calls
    pub fn then_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.then_reply(AssistantMessage::tool_calls(calls))
    }

    /// Queue a transport failure
    pub fn then_error(self, error: TransportError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Number of scripted completions not consumed yet
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<ChatCompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Connection {
                    message: "scripted chat client has no completion left".to_string(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handoff_core::ChatMessage;

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::user("hi")],
            tools: Vec::new(),
        }
    }

    #[test]
    fn test_replays_in_order_and_records_requests() {
        let client = ScriptedChatClient::new().then_text("one").then_text("two");
        let shared = client.clone();

        tokio_test::block_on(async {
            let first = shared.complete(&request()).await.unwrap();
            assert_eq!(first.into_message().unwrap().content_text(), "one");
            let second = shared.complete(&request()).await.unwrap();
            assert_eq!(second.into_message().unwrap().content_text(), "two");
        });

        assert_eq!(client.request_count(), 2);
        assert_eq!(client.remaining(), 0);
    }

    #[test]
    fn test_exhausted_script_fails() {
        let client = ScriptedChatClient::new();
        let result = tokio_test::block_on(client.complete(&request()));
        assert!(matches!(result, Err(TransportError::Connection { .. })));
    }
}
