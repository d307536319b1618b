//! Configuration management for BrainAI

use crate::llm::ModelFactory;
use crate::utils::errors::{BrainError, ConfigError};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the brain lives
    pub sandbox: SandboxConfig,
    /// Which model answers questions
    pub model: ModelConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Sandbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Root directory of the brain
    pub root: PathBuf,
    /// Whether to create the root on startup when it is missing
    pub create_if_missing: bool,
}

/// Model backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Backend name ("ollama" or "openai")
    pub provider: String,
    /// Model identifier understood by the backend
    pub model: String,
    /// Base URL of the backend API; the provider default when unset
    pub base_url: Option<String>,
    /// API key; `<PROVIDER>_API_KEY` takes precedence
    pub api_key: Option<String>,
    /// Maximum new tokens per answer
    pub max_tokens: u32,
    /// Sampling temperature; the backend default when unset
    pub temperature: Option<f32>,
    /// HTTP timeout for a single request (seconds)
    pub timeout_seconds: u64,
    /// Whether to probe the backend before opening the shell
    pub verify_on_startup: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or an EnvFilter directive
    pub level: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./brain"),
            create_if_missing: true,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "llama3.2-vision".to_string(),
            base_url: None,
            api_key: None,
            max_tokens: 200,
            temperature: None,
            timeout_seconds: 300, // 5 minutes
            verify_on_startup: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ModelConfig {
    /// API key from the environment or the config file
    pub fn resolved_api_key(&self) -> Option<String> {
        ApiKeyResolver::resolve_api_key(&self.provider, self.api_key.as_deref())
    }
}

impl Config {
    /// Check if the configuration is valid
    pub fn validate(&self) -> Result<()> {
        let provider = self.model.provider.to_lowercase();
        if !ModelFactory::list_providers().contains(&provider.as_str()) {
            return Err(BrainError::validation(
                "model.provider",
                format!(
                    "Unknown provider '{}', expected one of: {}",
                    self.model.provider,
                    ModelFactory::list_providers().join(", ")
                ),
            ));
        }

        if self.model.model.trim().is_empty() {
            return Err(BrainError::validation("model.model", "Model name is empty"));
        }

        if self.model.max_tokens == 0 {
            return Err(BrainError::validation(
                "model.max_tokens",
                "max_tokens must be greater than zero",
            ));
        }

        if self.sandbox.root.as_os_str().is_empty() {
            return Err(BrainError::validation("sandbox.root", "Sandbox root is empty"));
        }

        Ok(())
    }
}

/// Configuration manager for loading and saving the configuration file
pub struct ConfigManager {
    config: Config,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file yields the defaults; nothing is written.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self { config, config_path })
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Path the configuration is read from and saved to
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> Result<()> {
        Self::save_config(&self.config_path, &self.config)
    }

    /// `<config dir>/brain-ai/config.toml`
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::FileNotFound {
            path: PathBuf::from("config directory"),
        })?;
        Ok(config_dir.join("brain-ai").join("config.toml"))
    }

    /// Load configuration from file
    fn load_config(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError { source: e })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError { source: e })
            .map_err(Into::into)
    }

    /// Save configuration to file
    fn save_config(path: &Path, config: &Config) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError { source: e })?;
            }
        }

        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError { source: e })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError { source: e })?;

        Ok(())
    }
}

/// Centralized API key resolution logic
pub struct ApiKeyResolver;

impl ApiKeyResolver {
    /// Get API key for provider with environment variable precedence
    pub fn resolve_api_key(provider_name: &str, config_api_key: Option<&str>) -> Option<String> {
        let env_key = Self::env_key_name(provider_name);
        if let Ok(api_key) = std::env::var(&env_key) {
            if !api_key.trim().is_empty() {
                return Some(api_key);
            }
        }

        config_api_key.map(|s| s.to_string())
    }

    /// Get environment variable name for provider
    pub fn env_key_name(provider_name: &str) -> String {
        format!("{}_API_KEY", provider_name.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sandbox.root, PathBuf::from("./brain"));
        assert_eq!(config.model.provider, "ollama");
        assert_eq!(config.model.max_tokens, 200);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [model]
            provider = "openai"
            model = "meta-llama/Llama-3.2-11B-Vision-Instruct"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.model.max_tokens, 200);
        assert_eq!(config.sandbox, SandboxConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut manager = ConfigManager::load(Some(path.clone())).unwrap();
        assert!(!path.exists());
        manager.config_mut().sandbox.root = PathBuf::from("/srv/brain");
        manager.config_mut().model.temperature = Some(0.5);
        manager.save().unwrap();

        let reloaded = ConfigManager::load(Some(path)).unwrap();
        assert_eq!(reloaded.config(), manager.config());
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[model\nprovider = ").unwrap();

        let err = ConfigManager::load(Some(path)).err().unwrap();
        assert!(matches!(err, BrainError::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.model.provider = "carrier-pigeon".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_resolution() {
        std::env::remove_var("BRAINTEST_API_KEY");
        assert_eq!(ApiKeyResolver::resolve_api_key("braintest", Some("file-key")), Some("file-key".to_string()));
        assert_eq!(ApiKeyResolver::resolve_api_key("braintest", None), None);

        std::env::set_var("BRAINTEST_API_KEY", "env-key");
        assert_eq!(ApiKeyResolver::resolve_api_key("braintest", Some("file-key")), Some("env-key".to_string()));
        std::env::remove_var("BRAINTEST_API_KEY");

        assert_eq!(ApiKeyResolver::env_key_name("openai"), "OPENAI_API_KEY");
    }
}
