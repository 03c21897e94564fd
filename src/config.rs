//! Configuration management for Chatkeep
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChatkeepError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Chatkeep
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Text-generation provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Session store location
    #[serde(default)]
    pub storage: StorageConfig,
    /// Conversation behavior
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Points the client at a `generateContent`-style endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL (scheme and host, no trailing path)
    ///
    /// Tests point this at a mock server.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model used in the request path
    #[serde(default = "default_model")]
    pub model: String,

    /// API key sent in the `x-goog-api-key` header
    #[serde(default)]
    pub api_key: Option<String>,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Path of the sled database directory
    ///
    /// `None` resolves to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Placeholder name given to new sessions
    #[serde(default = "default_session_name")]
    pub default_session_name: String,

    /// Number of words of the first message used to name a session
    #[serde(default = "default_name_word_count")]
    pub name_word_count: usize,

    /// Bot message appended when a request fails
    #[serde(default = "default_error_reply")]
    pub error_reply: String,
}

fn default_session_name() -> String {
    crate::session::DEFAULT_SESSION_NAME.to_string()
}

fn default_name_word_count() -> usize {
    6
}

fn default_error_reply() -> String {
    "Error: Unable to get a response. Please try again.".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_session_name: default_session_name(),
            name_word_count: default_name_word_count(),
            error_reply: default_error_reply(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatkeepError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatkeepError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("CHATKEEP_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(model) = std::env::var("CHATKEEP_MODEL") {
            self.provider.model = model;
        }

        if let Ok(key) = std::env::var("CHATKEEP_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY"))
        {
            self.provider.api_key = Some(key);
        }

        if let Ok(timeout) = std::env::var("CHATKEEP_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CHATKEEP_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(store_path) = std::env::var("CHATKEEP_STORE_PATH") {
            self.storage.path = Some(PathBuf::from(store_path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.store_path {
            tracing::info!("Using session store override from CLI: {}", path.display());
            self.storage.path = Some(path.clone());
        }

        if let Some(model) = &cli.model {
            self.provider.model = model.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatkeepError::Config` naming the first invalid field
    pub fn validate(&self) -> Result<()> {
        let api_base = self.provider.api_base.trim();
        if api_base.is_empty() {
            return Err(ChatkeepError::Config("provider.api_base cannot be empty".to_string()).into());
        }

        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ChatkeepError::Config(format!(
                "provider.api_base must start with http:// or https://, got {}",
                api_base
            ))
            .into());
        }

        if self.provider.model.trim().is_empty() {
            return Err(ChatkeepError::Config("provider.model cannot be empty".to_string()).into());
        }

        if self.provider.timeout_seconds == 0 || self.provider.timeout_seconds > 600 {
            return Err(ChatkeepError::Config(
                "provider.timeout_seconds must be between 1 and 600".to_string(),
            )
            .into());
        }

        if self.chat.name_word_count == 0 {
            return Err(ChatkeepError::Config(
                "chat.name_word_count must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.default_session_name.trim().is_empty() {
            return Err(ChatkeepError::Config(
                "chat.default_session_name cannot be empty".to_string(),
            )
            .into());
        }

        if self.chat.error_reply.trim().is_empty() {
            return Err(
                ChatkeepError::Config("chat.error_reply cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}
