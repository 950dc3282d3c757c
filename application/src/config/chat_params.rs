//! Chat parameters - per-request model and pacing settings.
//!
//! [`ChatParams`] groups what
//! [`SendMessageUseCase`](crate::use_cases::send_message::SendMessageUseCase)
//! needs to build a request and assemble its reply. These are
//! application-layer concerns, resolved from the file config and CLI flags.

use streamchat_domain::FlushPolicy;

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Request and assembly parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Optional system prompt prepended to every request.
    pub system_prompt: Option<String>,
    /// Sampling temperature (provider default when `None`).
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens (provider default when `None`).
    pub max_tokens: Option<u32>,
    /// How the reply is batched into updates.
    pub flush: FlushPolicy,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            temperature: None,
            max_tokens: None,
            flush: FlushPolicy::default(),
        }
    }
}

impl ChatParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_flush_policy(mut self, flush: FlushPolicy) -> Self {
        self.flush = flush;
        self
    }
}
