//! Configuration file schema
//!
//! ```toml
//! [providers.primary]
//! name = "ark/deepseek-v3"
//! base_url = "https://ark.ap-southeast.bytepluses.com/api/v3"
//! model = "deepseek-v3-250324"
//! api_key_env = "ARK_API_KEY"
//! timeout_secs = 120
//!
//! [providers.secondary]
//! name = "groq/llama-3.3-70b"
//! base_url = "https://api.groq.com/openai/v1"
//! model = "llama-3.3-70b-versatile"
//! api_key_env = "GROQ_API_KEY"
//! timeout_secs = 60
//!
//! [engine]
//! temperature = 0.7
//! max_tokens = 2000
//!
//! [audit]
//! enabled = false
//! path = "consensus-audit.jsonl"
//! ```
//!
//! API keys never live in the file; only the names of the environment
//! variables holding them do.

use crate::providers::ProviderSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub providers: ProvidersConfig,
    pub engine: EngineConfig,
    pub audit: AuditConfig,
}

/// The two configured providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub primary: ProviderConfig,
    pub secondary: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: ProviderConfig {
                name: "ark/deepseek-v3".to_string(),
                base_url: "https://ark.ap-southeast.bytepluses.com/api/v3".to_string(),
                model: "deepseek-v3-250324".to_string(),
                api_key_env: "ARK_API_KEY".to_string(),
                // Ark models reason more slowly; give them headroom
                timeout_secs: 120,
            },
            secondary: ProviderConfig {
                name: "groq/llama-3.3-70b".to_string(),
                base_url: "https://api.groq.com/openai/v1".to_string(),
                model: "llama-3.3-70b-versatile".to_string(),
                api_key_env: "GROQ_API_KEY".to_string(),
                timeout_secs: 60,
            },
        }
    }
}

/// One provider's connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Resolve into adapter settings, reading the API key from the
    /// configured environment variable. An absent or empty variable leaves
    /// the provider unconfigured; the adapter reports that at call time.
    pub fn to_settings(&self) -> ProviderSettings {
        let api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());

        ProviderSettings {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key,
            api_key_env: self.api_key_env.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Engine request defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// JSONL audit log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("consensus-audit.jsonl"),
        }
    }
}
