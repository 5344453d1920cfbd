//! Configuration: file schema and multi-source loading

mod file_config;
mod loader;

pub use file_config::{AuditConfig, EngineConfig, FileConfig, ProviderConfig, ProvidersConfig};
pub use loader::ConfigLoader;
