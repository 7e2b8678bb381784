//! Content factory for loading everything a harness run needs.

use std::path::{Path, PathBuf};

use kinetic_core::{AttackLibrary, CharacterProfile, SimConfig};

use crate::loaders::{
    AttackLoader, ConfigLoader, LoadResult, ProfileLoader, ScenarioLoader, ScenarioSpec,
};

/// Content factory that loads all simulation content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── attacks.ron
/// ├── profiles/
/// │   └── hero.ron
/// └── scenarios/
///     └── slope_stick.ron
/// ```
///
/// Scenario documents refer to profiles and attack libraries by paths
/// relative to `data_dir`.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(SimConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load a character profile by path relative to the data directory.
    pub fn load_profile(&self, relative: &str) -> LoadResult<CharacterProfile> {
        ProfileLoader::load(&self.data_dir.join(relative))
    }

    /// Load an attack library by path relative to the data directory.
    pub fn load_attacks(&self, relative: &str) -> LoadResult<AttackLibrary> {
        AttackLoader::load(&self.data_dir.join(relative))
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<ScenarioSpec> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Load a scenario together with the profile and attack library it names.
    ///
    /// A scenario without an attack library gets an empty one.
    pub fn load_scenario_bundle(
        &self,
        name: &str,
    ) -> LoadResult<(ScenarioSpec, CharacterProfile, AttackLibrary)> {
        let scenario = self.load_scenario(name)?;
        let profile = self.load_profile(&scenario.profile)?;
        let attacks = match &scenario.attacks {
            Some(relative) => self.load_attacks(relative)?,
            None => AttackLibrary::new(),
        };
        Ok((scenario, profile, attacks))
    }

    /// Names of every scenario under `scenarios/`, sorted.
    pub fn scenario_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("scenarios");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| anyhow::anyhow!("Failed to read directory entry: {}", e))?
                .path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
