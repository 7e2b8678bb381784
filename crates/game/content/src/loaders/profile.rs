//! Character profile loader.

use std::path::Path;

use kinetic_core::CharacterProfile;

use crate::loaders::{LoadResult, read_file};

/// Loader for character profiles from RON files.
///
/// Every value-set field is optional in the file; omitted fields keep their
/// authored defaults.
pub struct ProfileLoader;

impl ProfileLoader {
    pub fn load(path: &Path) -> LoadResult<CharacterProfile> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse and validate RON text.
    pub fn parse(content: &str) -> LoadResult<CharacterProfile> {
        let profile: CharacterProfile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character profile RON: {}", e))?;
        profile.validate().map_err(|e| {
            anyhow::anyhow!("Invalid constants in profile '{}': {}", profile.name, e)
        })?;
        tracing::debug!(
            name = %profile.name,
            permeation = profile.permeation.is_some(),
            "profile loaded"
        );
        Ok(profile)
    }
}
