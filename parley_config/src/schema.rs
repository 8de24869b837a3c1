use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::credentials::DEFAULT_KEY_NAME;
use crate::error::{ConfigError, Result};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "ModelConfig::default_name")]
    pub name: String,
    /// Overrides the provider's public endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Seeded as the first message of every new session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            base_url: None,
            temperature: None,
            max_output_tokens: None,
            system_prompt: None,
        }
    }
}

impl ModelConfig {
    fn default_name() -> String {
        DEFAULT_MODEL.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CredentialsConfig {
    /// Key looked up in both the secrets file and the environment.
    #[serde(default = "CredentialsConfig::default_key_name")]
    pub key_name: String,
    #[serde(default = "CredentialsConfig::default_secrets_file")]
    pub secrets_file: PathBuf,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            key_name: Self::default_key_name(),
            secrets_file: Self::default_secrets_file(),
        }
    }
}

impl CredentialsConfig {
    fn default_key_name() -> String {
        DEFAULT_KEY_NAME.to_string()
    }

    fn default_secrets_file() -> PathBuf {
        PathBuf::from(".parley").join("secrets.toml")
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "model": {
    "name": "gemini-1.5-flash",
    "temperature": 0.7
  },
  "credentials": {
    "key_name": "GEMINI_API_KEY",
    "secrets_file": ".parley/secrets.toml"
  }
}"#;

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or(ConfigError::HomeDirNotFound)?
            .join("parley"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/parley/config.json`, falling back to defaults when it does not
    /// exist or there is no home directory to look in.
    pub fn load() -> Result<Self> {
        Self::load_optional(Self::config_path().ok())
    }

    fn load_optional(config_path: Option<PathBuf>) -> Result<Self> {
        let Some(config_path) = config_path else {
            warn!("Cannot find home directory, using default config");
            return Ok(Self::default());
        };
        if !config_path.exists() {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join("config.json");
        Self::write_template(&config_path)?;
        Ok(config_path)
    }

    fn write_template(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(ConfigError::AlreadyExists(config_path.to_path_buf()));
        }
        std::fs::write(config_path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}
