use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for an in-memory store and its connections.
///
/// Every field has a default, so a TOML file only needs the values it
/// overrides:
///
/// ```toml
/// writer_thread_name = "app-db"
/// max_key_len = 256
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix for the background writer thread of each connection.
    pub writer_thread_name: String,
    /// Maximum key length in bytes accepted by `put`.
    pub max_key_len: usize,
    /// Maximum collection name length in bytes accepted by `put`.
    pub max_collection_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            writer_thread_name: "shelf-writer".into(),
            max_key_len: 1024,
            max_collection_len: 256,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| StoreError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::ConfigParse(e.to_string()))
    }

    /// Validate all configuration parameters.
    pub fn validate(&self) -> StoreResult<()> {
        if self.writer_thread_name.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "writer_thread_name must not be empty".into(),
            ));
        }
        if self.max_key_len == 0 {
            return Err(StoreError::InvalidConfig("max_key_len must be > 0".into()));
        }
        if self.max_collection_len == 0 {
            return Err(StoreError::InvalidConfig(
                "max_collection_len must be > 0".into(),
            ));
        }
        Ok(())
    }
}
