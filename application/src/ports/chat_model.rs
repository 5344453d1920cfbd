//! Chat model port
//!
//! Defines the interface for invoking one chat-completion provider. The
//! engine holds two implementations of this port — primary and secondary —
//! and treats their failures differently (see the consensus use case).

use async_trait::async_trait;
use counsel_domain::{FinishReason, Message, Usage};
use thiserror::Error;

/// Default sampling temperature for consensus requests.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default output token budget for consensus requests.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Errors that can occur while invoking a provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key was available at call time. Configuration is validated
    /// lazily so that one unconfigured provider doesn't prevent startup.
    #[error("provider {provider} is not configured: set {api_key_env}")]
    Unconfigured {
        provider: String,
        api_key_env: String,
    },

    #[error("provider {provider} timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    #[error("provider {provider} returned HTTP {status}: {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("could not reach provider {provider}: {message}")]
    Connection { provider: String, message: String },

    /// The provider answered 2xx but the body was missing expected fields.
    #[error("malformed response from provider {provider}: {message}")]
    Malformed { provider: String, message: String },
}

/// A normalized chat-completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Ordered conversation messages
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A provider's raw answer, normalized from its wire format in one step.
///
/// Adapters must populate every field or fail with
/// [`ProviderError::Malformed`] — missing JSON fields never become silent
/// empty defaults that leak into policy code.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// Text of the answer
    pub content: String,
    /// Model identifier the provider reported (may differ from configured)
    pub model: String,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

/// One chat-completion provider
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Configured display name (e.g. "ark/deepseek-v3")
    fn name(&self) -> &str;

    /// Invoke the provider once and normalize its output.
    ///
    /// Must enforce a hard wall-clock timeout internally; a hung provider
    /// surfaces as [`ProviderError::Timeout`], never an indefinite await.
    async fn complete(&self, request: &CompletionRequest)
    -> Result<ChatCompletion, ProviderError>;
}
