//! Wire types for the OpenAI-compatible chat-completions API
//!
//! Deserialization is tolerant (every field optional) and validation happens
//! in one place, [`ChatResponseBody::normalize`], which either produces a
//! fully-populated [`ChatCompletion`] or a [`ProviderError::Malformed`].

use counsel_application::ports::chat_model::{ChatCompletion, ProviderError};
use counsel_domain::{FinishReason, Message, Usage};
use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequestBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseBody {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl ChatResponseBody {
    /// Validate and convert into a normalized completion.
    pub(crate) fn normalize(self, provider: &str) -> Result<ChatCompletion, ProviderError> {
        let malformed = |message: &str| ProviderError::Malformed {
            provider: provider.to_string(),
            message: message.to_string(),
        };

        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| malformed("response has no choices"))?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| malformed("choice is missing message content"))?;

        let finish_reason = choice
            .finish_reason
            .as_deref()
            .map(FinishReason::from_wire)
            .unwrap_or(FinishReason::Other("unknown".to_string()));

        let usage = match self.usage {
            Some(u) => {
                let prompt = u.prompt_tokens.unwrap_or(0);
                let completion = u.completion_tokens.unwrap_or(0);
                let total = u.total_tokens.unwrap_or(prompt + completion);
                Usage::new(prompt, completion, total)
            }
            None => Usage::default(),
        };

        Ok(ChatCompletion {
            content,
            model: self.model.unwrap_or_default(),
            finish_reason,
            usage,
        })
    }
}
