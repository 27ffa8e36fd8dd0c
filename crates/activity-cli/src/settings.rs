use std::path::Path;

use activity_core::ActivityConfig;
use activity_redis::RedisStoreConfig;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration file format, loaded from TOML.
///
/// Deserializes straight into the `activity-core`/`activity-redis` config
/// types (`[activity]`, `[redis]`) rather than through an intermediate DTO,
/// so there is exactly one definition of what each option means.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub activity: ActivityConfig,
    #[serde(default)]
    pub redis: RedisStoreConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing configuration file {}", path.display()))
    }
}
