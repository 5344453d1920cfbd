//! Infrastructure layer for dual-counsel
//!
//! Adapters that implement the application ports against the outside world:
//! the OpenAI-compatible HTTP provider client, layered file configuration,
//! and the JSONL audit logger.

pub mod config;
pub mod logging;
pub mod providers;

pub use config::{ConfigLoader, EngineConfig, FileConfig, ProviderConfig};
pub use logging::JsonlAuditLogger;
pub use providers::{OpenAiCompatModel, ProviderSettings};
