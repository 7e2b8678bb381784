//! Data-driven content definitions and loaders.
//!
//! This crate turns authored files into `kinetic-core` types:
//! - Character profiles (base value sets, RON)
//! - Attack libraries with sparse override bundles (RON)
//! - Scripted scenarios for the headless harness (RON)
//! - Simulation configuration (TOML)
//!
//! Content is loaded once and validated on the way in; the tick never sees
//! an unvalidated constant.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AttackCatalog, AttackLoader, AttackSpec, CommandSpec, ConfigLoader, ContentFactory,
    InputSpan, OverrideSpec, ProfileLoader, ScenarioEvent, ScenarioLoader, ScenarioSpec,
    StartSpec, WallSpec, WorldSpec,
};
