//! OpenAI-compatible chat-completion provider adapter
//!
//! One outbound `POST {base_url}/chat/completions` per call, bearer-token
//! auth, hard per-request timeout. A missing API key surfaces as
//! `ProviderError::Unconfigured` at call time, so a half-configured
//! deployment starts fine and only the affected provider fails.

use super::wire::{ChatRequestBody, ChatResponseBody};
use async_trait::async_trait;
use counsel_application::ports::chat_model::{
    ChatCompletion, ChatModel, CompletionRequest, ProviderError,
};
use counsel_domain::preview;
use std::time::{Duration, Instant};
use tracing::info;

/// Cap on how much of an error body we keep in error messages.
const ERROR_BODY_PREVIEW_BYTES: usize = 512;

/// Connection settings for one provider
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Display name used in logs and errors (e.g. "ark/deepseek-v3")
    pub name: String,
    /// API root, e.g. "https://api.groq.com/openai/v1"
    pub base_url: String,
    /// Model identifier sent in the request body
    pub model: String,
    /// Bearer token; `None` means the provider is unconfigured
    pub api_key: Option<String>,
    /// Environment variable the key was expected in (for error messages)
    pub api_key_env: String,
    /// Hard wall-clock deadline for one call
    pub timeout: Duration,
}

/// Chat model adapter for any OpenAI-compatible endpoint
pub struct OpenAiCompatModel {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl OpenAiCompatModel {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn classify_send_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout {
                provider: self.settings.name.clone(),
                seconds: self.settings.timeout.as_secs(),
            }
        } else {
            ProviderError::Connection {
                provider: self.settings.name.clone(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChatCompletion, ProviderError> {
        let api_key =
            self.settings
                .api_key
                .as_deref()
                .ok_or_else(|| ProviderError::Unconfigured {
                    provider: self.settings.name.clone(),
                    api_key_env: self.settings.api_key_env.clone(),
                })?;

        let body = ChatRequestBody {
            model: &self.settings.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .timeout(self.settings.timeout)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        if !status.is_success() {
            return Err(ProviderError::Http {
                provider: self.settings.name.clone(),
                status: status.as_u16(),
                body: preview(&text, ERROR_BODY_PREVIEW_BYTES).into_owned(),
            });
        }

        let parsed: ChatResponseBody =
            serde_json::from_str(&text).map_err(|e| ProviderError::Malformed {
                provider: self.settings.name.clone(),
                message: format!("invalid JSON: {e}"),
            })?;
        let completion = parsed.normalize(&self.settings.name)?;

        info!(
            provider = %self.settings.name,
            elapsed = started.elapsed().as_secs_f64(),
            tokens = completion.usage.total_tokens,
            "chat completion: {}",
            preview(&completion.content, 96)
        );

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counsel_domain::Message;

    fn settings(api_key: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            name: "groq/llama-3.3-70b".to_string(),
            base_url: "https://api.groq.com/openai/v1/".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key: api_key.map(String::from),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let model = OpenAiCompatModel::new(settings(Some("k")));
        assert_eq!(
            model.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn missing_api_key_fails_at_call_time() {
        let model = OpenAiCompatModel::new(settings(None));
        let request = CompletionRequest::new(vec![Message::user("q")]);

        let err = model.complete(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Unconfigured { ref api_key_env, .. } if api_key_env == "GROQ_API_KEY"
        ));
    }
}
