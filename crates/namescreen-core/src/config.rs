//! Configuration for namescreen
//!
//! Thresholds and fusion weights are tuning choices, not invariants, so they
//! live here rather than in code. Every section has defaults; a config file
//! only needs the keys it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decision::{OracleLimits, Thresholds};
use crate::error::ConfigError;
use crate::similarity::FusionWeights;
use crate::variants::MAX_EXTERNAL_NICKNAMES;

/// Top-level screening configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Decision thresholds
    pub thresholds: Thresholds,
    /// Metric fusion weights
    pub weights: FusionWeights,
    /// Candidate caps for disambiguation requests
    pub oracle: OracleLimits,
    /// Nickname table and lookup settings
    pub nicknames: NicknameConfig,
    /// LLM backend for disambiguation and nickname lookup
    pub llm: LlmConfig,
}

/// Nickname settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NicknameConfig {
    /// Maximum nicknames taken from an external lookup
    pub max_external: usize,
    /// Extra TOML nickname table merged over the built-in one
    pub extra_table: Option<PathBuf>,
}

impl Default for NicknameConfig {
    fn default() -> Self {
        Self {
            max_external: MAX_EXTERNAL_NICKNAMES,
            extra_table: None,
        }
    }
}

/// LLM backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider identifier (e.g. "groq", "openai", "mistral")
    pub provider: String,
    /// Model identifier
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout; a request that runs longer fails as unavailable
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.0,
            max_tokens: 512,
            timeout_seconds: 30,
        }
    }
}

impl ScreeningConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location: `<config dir>/namescreen/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("namescreen").join("config.toml"))
    }

    /// Load the config file from the default location, or defaults if there is none
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {:?}", path);
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        for (name, value) in [("high", t.high), ("low", t.low)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::OutOfRange(format!(
                    "threshold {name} must be between 0 and 100, got {value}"
                )));
            }
        }
        if t.low >= t.high {
            return Err(ConfigError::InvalidThresholds(
                "low threshold must be below high threshold".to_string(),
            ));
        }

        let w = &self.weights;
        for (name, value) in [
            ("token_set", w.token_set),
            ("token_sort", w.token_sort),
            ("ratio", w.ratio),
            ("partial", w.partial),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange(format!(
                    "weight {name} must be a non-negative number, got {value}"
                )));
            }
        }
        if w.total() <= 0.0 {
            return Err(ConfigError::OutOfRange(
                "fusion weights must not all be zero".to_string(),
            ));
        }

        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::OutOfRange(
                "llm timeout_seconds must be positive".to_string(),
            ));
        }

        if self.oracle.max_variants == 0 || self.oracle.max_article_names == 0 {
            return Err(ConfigError::OutOfRange(
                "oracle candidate caps must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
