//! Per-response confidence estimation
//!
//! Scores a single model answer's apparent quality from its own metadata,
//! independent of the other model. The score feeds the consensus policy:
//! under high agreement the higher-confidence answer wins.

use crate::chat::{FinishReason, Usage};
use crate::core::provider::ProviderRole;

const BASE: f64 = 0.5;

/// Bonus for an answer long enough to carry substance.
const SUBSTANTIAL_LENGTH_BONUS: f64 = 0.2;
const SUBSTANTIAL_LENGTH_CHARS: usize = 50;

/// Bonus for generation that ended naturally rather than being truncated.
const NATURAL_FINISH_BONUS: f64 = 0.2;

/// Bonus for token usage in a band typical of a well-formed answer.
const REASONABLE_USAGE_BONUS: f64 = 0.1;
const REASONABLE_USAGE_MIN: u32 = 100;
const REASONABLE_USAGE_MAX: u32 = 2000;

/// Penalty for suspiciously short completions.
const SHORT_COMPLETION_PENALTY: f64 = 0.2;
const SHORT_COMPLETION_TOKENS: u32 = 50;

/// Small deterministic tie-breaker in favor of the primary provider.
const PRIMARY_BONUS: f64 = 0.05;

/// Estimate how much a single answer can be trusted, in `[0, 1]`.
pub fn estimate_confidence(
    content: &str,
    finish_reason: &FinishReason,
    usage: &Usage,
    role: ProviderRole,
) -> f64 {
    let mut confidence = BASE;

    if content.chars().count() > SUBSTANTIAL_LENGTH_CHARS {
        confidence += SUBSTANTIAL_LENGTH_BONUS;
    }

    if finish_reason.is_natural() {
        confidence += NATURAL_FINISH_BONUS;
    }

    if (REASONABLE_USAGE_MIN..=REASONABLE_USAGE_MAX).contains(&usage.total_tokens) {
        confidence += REASONABLE_USAGE_BONUS;
    }

    if usage.completion_tokens < SHORT_COMPLETION_TOKENS {
        confidence -= SHORT_COMPLETION_PENALTY;
    }

    if role.is_primary() {
        confidence += PRIMARY_BONUS;
    }

    confidence.clamp(0.0, 1.0)
}
