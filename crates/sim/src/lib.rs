//! Headless harness for `kinetic-core`.
//!
//! Pairs a character with [`motor::PlaneMotor`], a minimal reference motor,
//! and replays scenarios authored for [`kinetic_content::ScenarioLoader`].

pub mod motor;
pub mod runner;

pub use motor::PlaneMotor;
pub use runner::{RunSummary, ScenarioRunner, TickSample};

use kinetic_content::ContentFactory;

/// Loads a named scenario and everything it references, ready to run.
pub fn prepare(factory: &ContentFactory, scenario: &str) -> anyhow::Result<ScenarioRunner> {
    let config = factory.load_config()?;
    let (scenario, profile, attacks) = factory.load_scenario_bundle(scenario)?;
    ScenarioRunner::new(scenario, &profile, attacks, config)
}
