//! Provider configuration loading
//!
//! Configuration comes from a trusted JSON file. `base_url` and `api_key`
//! are required; a missing or invalid file is fatal and must abort before
//! any crawl work begins.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::extractor::error::ConfigError;

/// Default location of the provider configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/secrets/vapourizer.json";

/// Connection settings for the extraction provider
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the provider API
    pub base_url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Model to request; the client default is used when absent
    #[serde(default)]
    pub model: Option<String>,

    /// Extra headers added to every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// PEM bundle to trust in addition to the system roots
    #[serde(default)]
    pub ca_certs_path: Option<PathBuf>,
}

impl LlmConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: LlmConfig = serde_json::from_str(&raw)?;

        if config.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("base_url"));
        }
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField("api_key"));
        }

        info!("Provider configuration loaded from {}", path.display());
        Ok(config)
    }
}
