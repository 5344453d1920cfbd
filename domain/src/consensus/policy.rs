//! Tiered consensus policy
//!
//! Given both answers and their similarity, decide what to return. Three
//! bands on similarity, each with its own selection and dampening; no
//! retries, no loops. The chosen text is always verbatim from one provider
//! — no branch averages or concatenates the two raw answers (the
//! low-agreement disclaimer is appended, not merged).

use super::response::{ConsensusMethod, ModelResponse};

/// Similarity at or above this routes to the high-agreement tier.
pub const HIGH_AGREEMENT_THRESHOLD: f64 = 0.85;

/// Similarity at or above this (and below high) routes to moderate.
pub const MODERATE_AGREEMENT_THRESHOLD: f64 = 0.60;

/// Agreement alone is not proof of correctness: even a winning answer never
/// keeps its full self-assessed confidence.
const HIGH_AGREEMENT_DAMPENING: f64 = 0.95;

/// Primary's weight in the moderate-tier confidence blend.
const PRIMARY_WEIGHT: f64 = 0.6;
const SECONDARY_WEIGHT: f64 = 0.4;
const MODERATE_DAMPENING: f64 = 0.9;

/// Confidence multiplier when the answers diverge.
const LOW_AGREEMENT_PENALTY: f64 = 0.7;

/// Appended verbatim to every low-agreement answer. Part of the uncertainty
/// handling, not optional UX copy.
pub const LOW_AGREEMENT_DISCLAIMER: &str = "\n\n---\nCatatan: Kedua model AI kami memberikan \
jawaban yang berbeda untuk pertanyaan ini, sehingga jawaban di atas berasal dari model utama \
saja. Untuk kepastian hukum, mohon konsultasikan permasalahan Anda dengan advokat atau \
konsultan hukum yang berkualifikasi.";

/// Outcome of the policy: what to return and how much to trust it.
#[derive(Debug, Clone)]
pub struct ConsensusDecision {
    pub final_content: String,
    pub confidence: f64,
    pub method: ConsensusMethod,
}

/// Select final content, confidence, and method from the two answers.
///
/// Not symmetric in provider identity: the primary wins confidence ties and
/// is the sole source in the low-agreement tier.
pub fn resolve(
    primary: &ModelResponse,
    secondary: &ModelResponse,
    similarity: f64,
) -> ConsensusDecision {
    if similarity >= HIGH_AGREEMENT_THRESHOLD {
        // The models agree; trust whichever scored itself higher.
        let (winner, method) = if primary.confidence >= secondary.confidence {
            (primary, ConsensusMethod::HighAgreementPrimary)
        } else {
            (secondary, ConsensusMethod::HighAgreementSecondary)
        };
        return ConsensusDecision {
            final_content: winner.content.clone(),
            confidence: winner.confidence * HIGH_AGREEMENT_DAMPENING,
            method,
        };
    }

    if similarity >= MODERATE_AGREEMENT_THRESHOLD {
        // Partial agreement: prefer the more detailed answer, blend the
        // confidences with the primary weighted higher.
        let winner = if primary.content_len() >= secondary.content_len() {
            primary
        } else {
            secondary
        };
        let blended =
            primary.confidence * PRIMARY_WEIGHT + secondary.confidence * SECONDARY_WEIGHT;
        return ConsensusDecision {
            final_content: winner.content.clone(),
            confidence: blended * MODERATE_DAMPENING,
            method: ConsensusMethod::ModerateAgreementWeighted,
        };
    }

    // Divergent answers: fall back to the primary, never the secondary, and
    // tell the user to seek professional advice.
    ConsensusDecision {
        final_content: format!("{}{}", primary.content, LOW_AGREEMENT_DISCLAIMER),
        confidence: primary.confidence * LOW_AGREEMENT_PENALTY,
        method: ConsensusMethod::LowAgreementConservative,
    }
}
