//! Attack library loader.
//!
//! Attacks are authored as a RON catalog. Override layers are written
//! sparsely: each layer names its operation, the value set it targets and
//! only the fields it touches. Unlisted fields are neutral for the operation
//! (zero for additive, one for multiplicative, unset for set layers).

use std::collections::BTreeMap;
use std::path::Path;

use kinetic_core::{
    AnyValues, AttackDefinition, AttackLibrary, FieldValue, OverrideBundle, OverrideKind,
    ValueSetKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One sparse override layer as authored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverrideSpec {
    pub kind: OverrideKind,
    pub target: ValueSetKind,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl OverrideSpec {
    /// Builds the layer's value set.
    pub fn to_values(&self) -> LoadResult<AnyValues> {
        AnyValues::from_fields(
            self.target,
            self.kind.sparse_fill(),
            self.fields.iter().map(|(name, value)| (name.as_str(), *value)),
        )
        .map_err(|e| anyhow::anyhow!("Invalid {} override: {}", self.kind, e))
    }
}

/// Resolves a list of authored layers into a bundle, preserving order.
pub fn resolve_bundle(specs: &[OverrideSpec]) -> LoadResult<OverrideBundle> {
    let mut bundle = OverrideBundle::new();
    for spec in specs {
        bundle.push(spec.to_values()?, spec.kind);
    }
    Ok(bundle)
}

/// Authored attack before its overrides are resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub name: String,
    pub animation: String,
    #[serde(default)]
    pub overrides: Vec<OverrideSpec>,
    #[serde(default)]
    pub hit_volumes: Vec<String>,
}

impl AttackSpec {
    pub fn resolve(&self) -> LoadResult<AttackDefinition> {
        let overrides = resolve_bundle(&self.overrides)
            .map_err(|e| anyhow::anyhow!("Attack '{}': {}", self.name, e))?;
        Ok(AttackDefinition::new(&self.name, &self.animation)
            .with_overrides(overrides)
            .with_hit_volumes(self.hit_volumes.iter().cloned()))
    }
}

/// Top-level RON document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackCatalog {
    pub attacks: Vec<AttackSpec>,
}

impl AttackCatalog {
    /// Resolves every attack. Duplicate names are rejected rather than
    /// silently replaced.
    pub fn into_library(self) -> LoadResult<AttackLibrary> {
        let mut library = AttackLibrary::new();
        for spec in &self.attacks {
            if spec.name.is_empty() {
                return Err(anyhow::anyhow!("Attack with empty name"));
            }
            if library.insert(spec.resolve()?).is_some() {
                return Err(anyhow::anyhow!("Duplicate attack '{}'", spec.name));
            }
        }
        Ok(library)
    }
}

/// Loader for attack libraries from RON files.
pub struct AttackLoader;

impl AttackLoader {
    pub fn load(path: &Path) -> LoadResult<AttackLibrary> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<AttackLibrary> {
        let catalog: AttackCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse attack catalog RON: {}", e))?;
        let library = catalog.into_library()?;
        tracing::debug!(attacks = library.len(), "attack library loaded");
        Ok(library)
    }
}
