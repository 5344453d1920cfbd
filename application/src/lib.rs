//! Application layer for dual-counsel
//!
//! Use cases and ports. The [`ConsensusEngine`] use case orchestrates the
//! dual-model fan-out; the [`ChatModel`] port defines how it talks to
//! providers. Adapters implementing the port live in the infrastructure
//! layer.

pub mod ports;
pub mod use_cases;

pub use ports::chat_model::{ChatCompletion, ChatModel, CompletionRequest, ProviderError};
pub use use_cases::get_consensus::{ConsensusEngine, ConsensusError, ConsensusRequest};
