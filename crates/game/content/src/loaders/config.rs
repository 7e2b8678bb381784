//! Simulation configuration loader.

use std::path::Path;

use kinetic_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for simulation configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a [`SimConfig`] from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate TOML text. Missing keys take their defaults.
    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
        tracing::debug!(tick_rate = config.tick_rate, "config loaded");
        Ok(config)
    }
}
