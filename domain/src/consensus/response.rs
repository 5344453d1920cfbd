//! Consensus result records
//!
//! [`ModelResponse`] captures one provider's answer plus the metadata the
//! policy needs; [`ConsensusResult`] is the single record returned to the
//! caller, retaining both answers for audit even when only one contributed
//! to the final content.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Confidence assigned to a synthesized fallback response.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

const FALLBACK_METADATA_KEY: &str = "is_fallback";

/// One provider's answer to a consensus request.
///
/// Created immediately after the provider call returns (or is synthesized
/// as a fallback when the secondary fails); immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Raw text returned by the model
    pub content: String,
    /// Which backend produced this (configured provider/model name)
    pub model_name: String,
    /// Quality estimate in `[0, 1]`
    pub confidence: f64,
    /// Wall-clock seconds for the provider call
    pub response_time: f64,
    /// Total tokens reported by the provider
    pub tokens_used: u32,
    /// Provider-specific extras, kept for diagnostics only — decision logic
    /// reads the typed fields above, never this map
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ModelResponse {
    pub fn new(
        content: impl Into<String>,
        model_name: impl Into<String>,
        confidence: f64,
        response_time: f64,
        tokens_used: u32,
    ) -> Self {
        Self {
            content: content.into(),
            model_name: model_name.into(),
            confidence: confidence.clamp(0.0, 1.0),
            response_time,
            tokens_used,
            metadata: HashMap::new(),
        }
    }

    /// Attach a diagnostic metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Synthesize a stand-in response after a secondary-provider failure.
    ///
    /// Mirrors the surviving answer's content so the pipeline completes on
    /// that text, at a neutral confidence, flagged so callers can tell it
    /// apart from a real answer.
    pub fn fallback(model_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(content, model_name, FALLBACK_CONFIDENCE, 0.0, 0)
            .with_metadata(FALLBACK_METADATA_KEY, serde_json::Value::Bool(true))
    }

    /// Whether this response was synthesized rather than returned by the
    /// provider
    pub fn is_fallback(&self) -> bool {
        self.metadata
            .get(FALLBACK_METADATA_KEY)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    /// Content length in characters (used by the moderate-agreement tier to
    /// pick the more detailed answer)
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// How the final content was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusMethod {
    /// Answers agreed; the primary's own confidence was higher
    HighAgreementPrimary,
    /// Answers agreed; the secondary's own confidence was higher
    HighAgreementSecondary,
    /// Partial agreement; the longer answer won, confidence blended
    ModerateAgreementWeighted,
    /// Divergent answers; primary returned with an attached disclaimer
    LowAgreementConservative,
}

impl std::fmt::Display for ConsensusMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConsensusMethod::HighAgreementPrimary => "high_agreement_primary",
            ConsensusMethod::HighAgreementSecondary => "high_agreement_secondary",
            ConsensusMethod::ModerateAgreementWeighted => "moderate_agreement_weighted",
            ConsensusMethod::LowAgreementConservative => "low_agreement_conservative",
        };
        write!(f, "{}", s)
    }
}

/// The single record produced per consensus request.
///
/// Both per-model responses are retained for audit and debugging even when
/// only one of them contributed to `final_content`. The engine never
/// persists this; the caller decides whether to log or store it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Text returned to the caller
    pub final_content: String,
    /// Overall confidence in `[0, 1]`
    pub consensus_confidence: f64,
    /// Which tier and selection produced `final_content`
    pub consensus_method: ConsensusMethod,
    /// The primary provider's answer (or the surviving answer)
    pub primary_response: ModelResponse,
    /// The secondary provider's answer (possibly a synthesized fallback)
    pub secondary_response: ModelResponse,
    /// Blended similarity between the two answers, in `[0, 1]`
    pub similarity_score: f64,
    /// End-to-end wall-clock seconds for the whole consensus request
    pub total_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped_on_construction() {
        let r = ModelResponse::new("x", "m", 1.7, 0.1, 10);
        assert_eq!(r.confidence, 1.0);
        let r = ModelResponse::new("x", "m", -0.3, 0.1, 10);
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn fallback_is_flagged() {
        let r = ModelResponse::fallback("groq/llama-3.3-70b", "carried over");
        assert!(r.is_fallback());
        assert_eq!(r.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(r.content, "carried over");
        assert_eq!(r.tokens_used, 0);
    }

    #[test]
    fn regular_response_is_not_fallback() {
        let r = ModelResponse::new("answer", "ark/deepseek-v3", 0.8, 1.2, 400);
        assert!(!r.is_fallback());
    }

    #[test]
    fn content_len_counts_characters() {
        let r = ModelResponse::new("héllo", "m", 0.5, 0.0, 0);
        assert_eq!(r.content_len(), 5);
    }

    #[test]
    fn method_serializes_snake_case() {
        let json = serde_json::to_string(&ConsensusMethod::HighAgreementPrimary).unwrap();
        assert_eq!(json, r#""high_agreement_primary""#);
        assert_eq!(
            ConsensusMethod::LowAgreementConservative.to_string(),
            "low_agreement_conservative"
        );
    }

    #[test]
    fn result_round_trips_through_json() {
        let result = ConsensusResult {
            final_content: "jawaban".into(),
            consensus_confidence: 0.72,
            consensus_method: ConsensusMethod::ModerateAgreementWeighted,
            primary_response: ModelResponse::new("jawaban", "ark", 0.8, 1.0, 200),
            secondary_response: ModelResponse::new("jawaban b", "groq", 0.6, 0.5, 150),
            similarity_score: 0.7,
            total_time: 1.1,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: ConsensusResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.final_content, "jawaban");
        assert_eq!(
            back.consensus_method,
            ConsensusMethod::ModerateAgreementWeighted
        );
        assert_eq!(back.secondary_response.model_name, "groq");
    }
}
