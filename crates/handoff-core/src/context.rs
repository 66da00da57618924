//! Per-invocation conversation context.
//!
//! A capability that declares a context parameter receives a
//! [`ConversationContext`] borrowing the live history and the developer
//! key/value map. Changes made through it are visible to the orchestrator
//! as soon as the handler returns.

use crate::message::ChatMessage;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Free-form state shared between the host application and capabilities.
pub type DeveloperContext = HashMap<String, Value>;

/// Mutable view of a conversation, valid for the duration of one call.
#[derive(Debug)]
pub struct ConversationContext<'a> {
    history: &'a mut Vec<ChatMessage>,
    developer: &'a mut DeveloperContext,
}

impl<'a> ConversationContext<'a> {
    pub fn new(history: &'a mut Vec<ChatMessage>, developer: &'a mut DeveloperContext) -> Self {
        Self { history, developer }
    }

    pub fn history(&self) -> &[ChatMessage] {
        self.history
    }

    /// Mutable access to the history. Capabilities may truncate or rewrite it.
    pub fn history_mut(&mut self) -> &mut Vec<ChatMessage> {
        self.history
    }

    pub fn developer(&self) -> &DeveloperContext {
        self.developer
    }

    pub fn developer_mut(&mut self) -> &mut DeveloperContext {
        self.developer
    }

    /// Store a developer value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.developer.insert(key.into(), value.into())
    }

    /// Read a developer value as `T`.
    ///
    /// Returns `None` when the key is absent or the stored value does not
    /// deserialize into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.developer
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Reborrow with a shorter lifetime.
    pub fn reborrow(&mut self) -> ConversationContext<'_> {
        ConversationContext {
            history: self.history,
            developer: self.developer,
        }
    }
}
