//! Domain layer for dual-counsel
//!
//! This crate contains the core business logic of the dual-model consensus
//! engine. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Dual-model consensus
//!
//! Two independently configured chat models ("primary" and "secondary")
//! answer the same question. Their answers are compared with a lightweight,
//! deterministic similarity metric and reconciled by a tiered policy:
//!
//! - **High agreement**: trust the answer whose own quality estimate is higher
//! - **Moderate agreement**: prefer the more detailed answer, dampen confidence
//! - **Low agreement**: fall back to the primary answer and attach a
//!   disclaimer steering the user toward a qualified professional
//!
//! The primary provider is favored in ties and in failure handling; the
//! secondary exists to corroborate, not to replace.

pub mod chat;
pub mod consensus;
pub mod core;
pub mod util;

// Re-export commonly used types
pub use chat::{FinishReason, Message, Role, Usage};
pub use consensus::{
    confidence::estimate_confidence,
    policy::{self, ConsensusDecision, LOW_AGREEMENT_DISCLAIMER},
    response::{ConsensusMethod, ConsensusResult, ModelResponse},
    similarity::response_similarity,
};
pub use crate::core::provider::ProviderRole;
pub use util::preview;
