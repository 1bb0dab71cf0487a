//! Configuration loading, validation, and management for Switchboard.
//!
//! Loads configuration from `~/.switchboard/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use switchboard_core::ServiceId;

/// The root configuration structure.
///
/// Maps directly to `~/.switchboard/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend used when none is named on the command line
    #[serde(default = "default_service")]
    pub default_service: ServiceId,

    /// Model hint forwarded to backends that accept one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Where the backends listen
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Conversation history settings
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_service() -> ServiceId {
    ServiceId::Rag
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    /// Base URL of the process hosting the RAG, Graph and CrewAI endpoints
    #[serde(default = "default_question_url")]
    pub question_url: String,

    /// Base URL of the local inference server
    #[serde(default = "default_inference_url")]
    pub inference_url: String,
}

fn default_question_url() -> String {
    "http://localhost:8000".into()
}
fn default_inference_url() -> String {
    "http://localhost:11434".into()
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            question_url: default_question_url(),
            inference_url: default_inference_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Override for the history directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.switchboard/config.toml).
    ///
    /// Environment variables override the file:
    /// - `SWITCHBOARD_SERVICE`
    /// - `SWITCHBOARD_MODEL`
    /// - `SWITCHBOARD_QUESTION_URL`
    /// - `SWITCHBOARD_INFERENCE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides, looking each key up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(service) = lookup("SWITCHBOARD_SERVICE") {
            self.default_service = service
                .parse()
                .map_err(|e| ConfigError::ValidationError(format!("SWITCHBOARD_SERVICE: {e}")))?;
        }

        if let Some(model) = lookup("SWITCHBOARD_MODEL").filter(|m| !m.trim().is_empty()) {
            self.default_model = Some(model);
        }

        if let Some(url) = lookup("SWITCHBOARD_QUESTION_URL") {
            self.backends.question_url = url;
        }

        if let Some(url) = lookup("SWITCHBOARD_INFERENCE_URL") {
            self.backends.inference_url = url;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".switchboard")
    }

    /// Directory holding the conversation history files.
    pub fn history_dir(&self) -> PathBuf {
        self.history
            .dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("history"))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, url) in [
            ("backends.question_url", &self.backends.question_url),
            ("backends.inference_url", &self.backends.inference_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_service: default_service(),
            default_model: None,
            backends: BackendsConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
