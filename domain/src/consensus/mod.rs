//! Dual-model consensus
//!
//! The heart of dual-counsel: given two answers to the same question, decide
//! what to return and how much to trust it.
//!
//! - [`similarity`] scores how much the two answers agree
//! - [`confidence`] scores each answer's apparent quality on its own
//! - [`policy`] turns similarity plus confidences into a final decision
//! - [`response`] holds the per-model and final result records

pub mod confidence;
pub mod policy;
pub mod response;
pub mod similarity;

pub use confidence::estimate_confidence;
pub use policy::{ConsensusDecision, LOW_AGREEMENT_DISCLAIMER, resolve};
pub use response::{ConsensusMethod, ConsensusResult, ModelResponse};
pub use similarity::response_similarity;
