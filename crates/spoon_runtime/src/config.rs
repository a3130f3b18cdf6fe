//! Runtime configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spoon_core::WorldConfig;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    /// Frames to run before exiting.
    pub frames: u64,
    /// Fixed step in milliseconds; measured wall-clock time when absent.
    pub fixed_delta_ms: Option<u64>,
    /// Cubes spawned into the demo scene.
    pub entities: u32,
    /// Log frame statistics every this many frames; 0 disables.
    pub log_every: u64,
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("malformed runtime config")?;
        config.world.validate()?;
        anyhow::ensure!(
            config.entities < config.world.capacity,
            "scene needs {} entities plus a camera but capacity is {}",
            config.entities,
            config.world.capacity
        );
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn fixed_delta(&self) -> Option<Duration> {
        self.fixed_delta_ms.map(Duration::from_millis)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            frames: 600,
            fixed_delta_ms: None,
            entities: 64,
            log_every: 120,
        }
    }
}
