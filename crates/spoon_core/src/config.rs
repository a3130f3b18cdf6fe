//! World configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default number of live entities a world can hold.
pub const DEFAULT_CAPACITY: u32 = 5000;

/// Upper bound accepted from configuration files.
pub const MAX_CAPACITY: u32 = 1 << 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("entity capacity must be between 1 and {max}, got {capacity}")]
    InvalidCapacity { capacity: u32, max: u32 },
}

/// Settings fixed at world construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum live entities, shared by every component store.
    pub capacity: u32,
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = WorldConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = WorldConfig::from_json_str(r#"{ "capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCapacity { capacity: 0, .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = WorldConfig::from_json_str("{ capacity: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = WorldConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
