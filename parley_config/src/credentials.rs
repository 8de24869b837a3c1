//! Credential resolution.
//!
//! Sources are tried in order and the first non-empty value wins. A source
//! that fails (unreadable file, bad TOML, missing key) is skipped; only the
//! absence of a value from every source is an error.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::schema::CredentialsConfig;

pub const DEFAULT_KEY_NAME: &str = "GEMINI_API_KEY";

/// An API key resolved at startup.
///
/// Formatting never prints the secret; use [`Credential::expose`] at the one
/// place that sends it.
#[derive(Clone)]
pub struct Credential {
    value: String,
    source: String,
}

impl Credential {
    pub fn new(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Name of the source the value came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        if chars.len() > 8 {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &self.masked())
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

pub trait CredentialSource: Send + Sync {
    fn name(&self) -> &str;

    fn lookup(&self, key: &str) -> anyhow::Result<Option<String>>;
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Deployment secret registry: a TOML file with the key at top level.
pub struct SecretsFileSource {
    path: PathBuf,
}

impl SecretsFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialSource for SecretsFileSource {
    fn name(&self) -> &'static str {
        "secrets file"
    }

    fn lookup(&self, key: &str) -> anyhow::Result<Option<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let table: toml::Table = toml::from_str(&content)?;
        let value = match table.get(key) {
            None => None,
            Some(toml::Value::String(s)) => non_empty(s),
            Some(other) => anyhow::bail!(
                "{key} in {} is a {}, expected a string",
                self.path.display(),
                other.type_str()
            ),
        };
        Ok(value)
    }
}

type EnvReader = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Process environment.
pub struct EnvSource {
    reader: EnvReader,
}

impl EnvSource {
    #[must_use]
    pub fn new() -> Self {
        Self::with_reader(|key| std::env::var(key).ok())
    }

    /// Read variables through `reader` instead of the real environment.
    pub fn with_reader(reader: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvSource {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn lookup(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok((self.reader)(key).as_deref().and_then(non_empty))
    }
}

/// Ordered list of credential sources for one key.
pub struct CredentialResolver {
    key: String,
    secrets_file: PathBuf,
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    /// A resolver with no sources. `secrets_file` is only used in the error message.
    pub fn new(key: impl Into<String>, secrets_file: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            secrets_file: secrets_file.into(),
            sources: Vec::new(),
        }
    }

    /// The standard order: secrets file first, then the environment.
    #[must_use]
    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self::new(config.key_name.clone(), config.secrets_file.clone())
            .with_source(SecretsFileSource::new(config.secrets_file.clone()))
            .with_source(EnvSource::new())
    }

    #[must_use]
    pub fn with_source(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn resolve(&self) -> Result<Credential> {
        for source in &self.sources {
            match source.lookup(&self.key) {
                Ok(Some(value)) => {
                    info!("Resolved {} from {}", self.key, source.name());
                    return Ok(Credential::new(value, source.name()));
                }
                Ok(None) => debug!("{} not set in {}", self.key, source.name()),
                Err(e) => debug!("{} lookup failed in {}: {e}", self.key, source.name()),
            }
        }

        Err(ConfigError::MissingCredential {
            key: self.key.clone(),
            secrets_file: self.secrets_file.clone(),
        })
    }
}

/// Load a `.env` file from the working directory into the environment, if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to load .env file: {e}"),
    }
}
