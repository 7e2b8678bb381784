//! Content loaders for reading simulation data from files.
//!
//! RON carries structured content (profiles, attacks, scenarios); TOML
//! carries flat configuration. Every loader validates what it returns.

pub mod attacks;
pub mod config;
pub mod factory;
pub mod profile;
pub mod scenario;

pub use attacks::{AttackCatalog, AttackLoader, AttackSpec, OverrideSpec};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use profile::ProfileLoader;
pub use scenario::{
    CommandSpec, InputSpan, ScenarioEvent, ScenarioLoader, ScenarioSpec, StartSpec, WallSpec,
    WorldSpec,
};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
