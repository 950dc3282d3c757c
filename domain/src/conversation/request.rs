//! Outbound chat completion request.

use super::entities::{Conversation, Message};
use serde::{Deserialize, Serialize};

/// Body of a streaming chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Build a streaming request from the conversation so far.
    ///
    /// The system prompt, when present and non-blank, goes first.
    pub fn streaming(
        model: impl Into<String>,
        system_prompt: Option<&str>,
        conversation: &Conversation,
    ) -> Self {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        if let Some(prompt) = system_prompt.filter(|p| !p.trim().is_empty()) {
            messages.push(Message::system(prompt));
        }
        messages.extend(conversation.messages().iter().cloned());

        Self {
            model: model.into(),
            messages,
            stream: true,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}
