//! Get-consensus use case
//!
//! The public entry point of dual-counsel: ask both providers the same
//! question concurrently, score their agreement, and reconcile the answers
//! through the tiered policy.
//!
//! Failure handling is deliberately asymmetric. The secondary exists to
//! corroborate: if it fails, a flagged fallback response is synthesized and
//! the request completes on the primary's answer. If the primary fails,
//! the whole request fails — no secondary-only answer is ever produced.

use crate::ports::chat_model::{
    ChatModel, CompletionRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, ProviderError,
};
use counsel_domain::{
    ConsensusResult, Message, ModelResponse, ProviderRole, estimate_confidence, policy, preview,
    response_similarity,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can end a consensus request
#[derive(Error, Debug)]
pub enum ConsensusError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// The primary provider failed. The primary is the trusted source of
    /// truth, so its failure is fatal even if the secondary answered.
    #[error("primary provider failed: {0}")]
    Primary(#[source] ProviderError),
}

/// Input for a consensus request
#[derive(Debug, Clone)]
pub struct ConsensusRequest {
    /// The user's question
    pub prompt: String,
    /// Optional system instruction sent to both providers
    pub system_prompt: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ConsensusRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn to_completion_request(&self) -> CompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(self.prompt.clone()));
        CompletionRequest::new(messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

/// The dual-model consensus engine.
///
/// Construct one per process and inject it into request handlers; it holds
/// no per-request state, so sharing behind an `Arc` is safe.
pub struct ConsensusEngine {
    primary: Arc<dyn ChatModel>,
    secondary: Arc<dyn ChatModel>,
}

impl ConsensusEngine {
    pub fn new(primary: Arc<dyn ChatModel>, secondary: Arc<dyn ChatModel>) -> Self {
        Self { primary, secondary }
    }

    /// Ask both providers and reconcile their answers into one result.
    ///
    /// The two provider calls run concurrently and are both awaited — there
    /// is no "first one wins" race, because consensus needs both answers
    /// (or an explicit fallback). Dropping the returned future, e.g. under
    /// a caller-imposed timeout, cancels both in-flight calls together.
    pub async fn get_consensus_response(
        &self,
        request: ConsensusRequest,
    ) -> Result<ConsensusResult, ConsensusError> {
        if request.prompt.trim().is_empty() {
            return Err(ConsensusError::EmptyPrompt);
        }

        let started = Instant::now();
        let completion_request = request.to_completion_request();

        info!(
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            "starting dual-model consensus"
        );

        let (primary_result, secondary_result) = tokio::join!(
            Self::call_model(
                self.primary.as_ref(),
                ProviderRole::Primary,
                &completion_request
            ),
            Self::call_model(
                self.secondary.as_ref(),
                ProviderRole::Secondary,
                &completion_request
            ),
        );

        let primary_response = primary_result.map_err(ConsensusError::Primary)?;

        let secondary_response = match secondary_result {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    secondary = self.secondary.name(),
                    "secondary provider failed, degrading to fallback: {e}"
                );
                ModelResponse::fallback(self.secondary.name(), primary_response.content.clone())
            }
        };

        let similarity =
            response_similarity(&primary_response.content, &secondary_response.content);
        let decision = policy::resolve(&primary_response, &secondary_response, similarity);

        info!(
            similarity,
            method = %decision.method,
            confidence = decision.confidence,
            "consensus resolved"
        );

        Ok(ConsensusResult {
            final_content: decision.final_content,
            consensus_confidence: decision.confidence,
            consensus_method: decision.method,
            primary_response,
            secondary_response,
            similarity_score: similarity,
            total_time: started.elapsed().as_secs_f64(),
        })
    }

    /// Invoke one provider and fold its answer into a scored response.
    async fn call_model(
        model: &dyn ChatModel,
        role: ProviderRole,
        request: &CompletionRequest,
    ) -> Result<ModelResponse, ProviderError> {
        let started = Instant::now();
        let completion = model.complete(request).await?;
        let elapsed = started.elapsed().as_secs_f64();

        let confidence = estimate_confidence(
            &completion.content,
            &completion.finish_reason,
            &completion.usage,
            role,
        );

        debug!(
            provider = %role,
            model = model.name(),
            elapsed,
            "model answered: {}",
            preview(&completion.content, 96)
        );

        Ok(ModelResponse::new(
            completion.content,
            model.name(),
            confidence,
            elapsed,
            completion.usage.total_tokens,
        )
        .with_metadata("finish_reason", json!(completion.finish_reason.to_string()))
        .with_metadata("reported_model", json!(completion.model))
        .with_metadata(
            "usage",
            json!({
                "prompt_tokens": completion.usage.prompt_tokens,
                "completion_tokens": completion.usage.completion_tokens,
                "total_tokens": completion.usage.total_tokens,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chat_model::ChatCompletion;
    use async_trait::async_trait;
    use counsel_domain::{ConsensusMethod, FinishReason, LOW_AGREEMENT_DISCLAIMER, Usage};

    struct StubModel {
        name: String,
        outcome: Option<ChatCompletion>,
    }

    #[async_trait]
    impl ChatModel for StubModel {
        fn name(&self) -> &str {
            &self.name
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<ChatCompletion, ProviderError> {
            match &self.outcome {
                Some(completion) => Ok(completion.clone()),
                None => Err(ProviderError::Timeout {
                    provider: self.name.clone(),
                    seconds: 60,
                }),
            }
        }
    }

    fn answering(name: &str, content: &str, usage: Usage) -> Arc<StubModel> {
        Arc::new(StubModel {
            name: name.to_string(),
            outcome: Some(ChatCompletion {
                content: content.to_string(),
                model: name.to_string(),
                finish_reason: FinishReason::Stop,
                usage,
            }),
        })
    }

    fn failing(name: &str) -> Arc<StubModel> {
        Arc::new(StubModel {
            name: name.to_string(),
            outcome: None,
        })
    }

    fn engine(primary: Arc<StubModel>, secondary: Arc<StubModel>) -> ConsensusEngine {
        ConsensusEngine::new(primary, secondary)
    }

    const LONG_ANSWER: &str = "Berdasarkan Pasal 1320 KUHPerdata, sahnya suatu perjanjian \
         memerlukan kesepakatan, kecakapan, suatu hal tertentu, dan sebab yang halal.";

    #[tokio::test]
    async fn identical_answers_reach_high_agreement_on_primary() {
        let usage = Usage::new(100, 200, 300);
        let engine = engine(
            answering("ark/deepseek-v3", LONG_ANSWER, usage),
            answering("groq/llama-3.3-70b", LONG_ANSWER, usage),
        );

        let result = engine
            .get_consensus_response(ConsensusRequest::new("Apa syarat sah perjanjian?"))
            .await
            .unwrap();

        assert_eq!(result.similarity_score, 1.0);
        assert_eq!(
            result.consensus_method,
            ConsensusMethod::HighAgreementPrimary
        );
        assert_eq!(result.final_content, LONG_ANSWER);
        assert!(
            result.consensus_confidence
                <= result
                    .primary_response
                    .confidence
                    .max(result.secondary_response.confidence)
        );
        assert!(!result.final_content.contains(LOW_AGREEMENT_DISCLAIMER));
    }

    #[tokio::test]
    async fn paraphrased_answers_blend_in_moderate_tier() {
        // similarity 0.8255 for this pair: moderate band
        let engine = engine(
            answering(
                "ark/deepseek-v3",
                "Pasal 378 KUHP mengatur tentang penipuan.",
                Usage::new(70, 80, 150),
            ),
            answering(
                "groq/llama-3.3-70b",
                "Pasal 378 KUHP mengatur soal penipuan.",
                Usage::new(60, 80, 140),
            ),
        );

        let result = engine
            .get_consensus_response(ConsensusRequest::new("Pasal berapa soal penipuan?"))
            .await
            .unwrap();

        assert_eq!(
            result.consensus_method,
            ConsensusMethod::ModerateAgreementWeighted
        );
        assert!(
            result.similarity_score >= 0.60 && result.similarity_score < 0.85,
            "similarity {}",
            result.similarity_score
        );
        // The longer (primary) answer wins verbatim
        assert_eq!(result.final_content, "Pasal 378 KUHP mengatur tentang penipuan.");
        // (0.85*0.6 + 0.8*0.4) * 0.9
        assert!(
            (result.consensus_confidence - 0.747).abs() < 1e-12,
            "confidence {}",
            result.consensus_confidence
        );
        assert!(result.consensus_confidence > 0.6);
        assert!(!result.final_content.contains(LOW_AGREEMENT_DISCLAIMER));
    }

    #[tokio::test]
    async fn divergent_answers_fall_back_to_primary_with_disclaimer() {
        let engine = engine(
            answering(
                "ark/deepseek-v3",
                "Gugatan wanprestasi diajukan ke pengadilan negeri.",
                Usage::new(70, 80, 150),
            ),
            answering(
                "groq/llama-3.3-70b",
                "completely different text entirely",
                Usage::new(60, 80, 140),
            ),
        );

        let result = engine
            .get_consensus_response(ConsensusRequest::new("Ke mana gugatan diajukan?"))
            .await
            .unwrap();

        assert_eq!(
            result.consensus_method,
            ConsensusMethod::LowAgreementConservative
        );
        assert!(result.similarity_score < 0.60);
        assert!(
            result
                .final_content
                .starts_with("Gugatan wanprestasi diajukan ke pengadilan negeri.")
        );
        assert!(result.final_content.ends_with(LOW_AGREEMENT_DISCLAIMER));
        assert!(
            (result.consensus_confidence - result.primary_response.confidence * 0.7).abs()
                < 1e-12
        );
    }

    #[tokio::test]
    async fn secondary_failure_degrades_to_fallback() {
        let engine = engine(
            answering("ark/deepseek-v3", LONG_ANSWER, Usage::new(100, 200, 300)),
            failing("groq/llama-3.3-70b"),
        );

        let result = engine
            .get_consensus_response(ConsensusRequest::new("Apa syarat sah perjanjian?"))
            .await
            .unwrap();

        assert!(result.secondary_response.is_fallback());
        assert_eq!(result.secondary_response.model_name, "groq/llama-3.3-70b");
        assert_eq!(result.secondary_response.confidence, 0.5);
        // The pipeline completes on the primary's answer
        assert_eq!(result.final_content, LONG_ANSWER);
        assert_eq!(
            result.consensus_method,
            ConsensusMethod::HighAgreementPrimary
        );
    }

    #[tokio::test]
    async fn primary_failure_propagates() {
        let engine = engine(
            failing("ark/deepseek-v3"),
            answering("groq/llama-3.3-70b", LONG_ANSWER, Usage::new(100, 200, 300)),
        );

        let err = engine
            .get_consensus_response(ConsensusRequest::new("Apa syarat sah perjanjian?"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConsensusError::Primary(ProviderError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let engine = engine(
            answering("a", LONG_ANSWER, Usage::default()),
            answering("b", LONG_ANSWER, Usage::default()),
        );

        let err = engine
            .get_consensus_response(ConsensusRequest::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsensusError::EmptyPrompt));
    }

    #[test]
    fn system_prompt_and_overrides_flow_into_the_request() {
        let request = ConsensusRequest::new("q")
            .with_system_prompt("You are a careful Indonesian legal assistant.")
            .with_temperature(0.2)
            .with_max_tokens(512);

        let completion_request = request.to_completion_request();
        assert_eq!(completion_request.messages.len(), 2);
        assert_eq!(completion_request.temperature, 0.2);
        assert_eq!(completion_request.max_tokens, 512);
    }

    #[tokio::test]
    async fn responses_carry_diagnostic_metadata() {
        let engine = engine(
            answering("ark/deepseek-v3", LONG_ANSWER, Usage::new(100, 200, 300)),
            answering("groq/llama-3.3-70b", LONG_ANSWER, Usage::new(100, 200, 300)),
        );

        let result = engine
            .get_consensus_response(ConsensusRequest::new("q"))
            .await
            .unwrap();

        let meta = &result.primary_response.metadata;
        assert_eq!(meta["finish_reason"], "stop");
        assert_eq!(meta["usage"]["total_tokens"], 300);
        assert_eq!(result.primary_response.tokens_used, 300);
    }
}
