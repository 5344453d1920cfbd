//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_CONFIG_NAMES: [&str; 2] = ["counsel.toml", ".counsel.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./counsel.toml` or `./.counsel.toml`
    /// 3. `$XDG_CONFIG_HOME/dual-counsel/config.toml` (or the platform
    ///    equivalent)
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for `--no-config`)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dual-counsel").join("config.toml"))
    }

    /// Get the project-level config file path (if one exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("override.toml");
        std::fs::write(
            &path,
            r#"
            [engine]
            temperature = 0.2

            [audit]
            enabled = true
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.engine.temperature, 0.2);
        assert!(config.audit.enabled);
        // Defaults survive for everything the file doesn't mention
        assert_eq!(config.engine.max_tokens, 2000);
        assert_eq!(config.providers.primary.api_key_env, "ARK_API_KEY");
    }

    #[test]
    fn defaults_load_without_any_files() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.providers.secondary.name, "groq/llama-3.3-70b");
    }
}
