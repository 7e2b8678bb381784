//! Scripted scenario loader for the headless harness.
//!
//! A scenario names the character content to spawn, describes a flat test
//! world, and scripts input spans and timed commands against tick numbers.

use std::path::Path;

use glam::Vec3;
use kinetic_core::{CharacterCommand, ColliderTags, MovementInput};
use serde::{Deserialize, Serialize};

use crate::loaders::attacks::{OverrideSpec, resolve_bundle};
use crate::loaders::{LoadResult, read_file};

/// Where the character starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartSpec {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// A vertical wall at `x`, spanning the whole world height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub id: u32,
    pub x: f32,
    #[serde(default = "solid")]
    pub tags: ColliderTags,
}

fn solid() -> ColliderTags {
    ColliderTags::SOLID
}

/// Flat floor plus walls in the XY plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSpec {
    pub floor_height: f32,
    /// Slope of the floor in degrees, tilting around the plane axis.
    pub floor_slope: f32,
    pub walls: Vec<WallSpec>,
}

impl Default for WorldSpec {
    fn default() -> Self {
        Self {
            floor_height: 0.0,
            floor_slope: 0.0,
            walls: Vec::new(),
        }
    }
}

/// Input held over the half-open tick range `[from, until)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputSpan {
    pub from: u64,
    pub until: u64,
    #[serde(default)]
    pub move_axis: f32,
    #[serde(default)]
    pub jump: bool,
}

impl InputSpan {
    pub fn covers(&self, tick: u64) -> bool {
        (self.from..self.until).contains(&tick)
    }
}

/// Authored form of a [`CharacterCommand`].
///
/// Overlap endings come from the motor, so they cannot be scripted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CommandSpec {
    Attack(String),
    Committal,
    Bufferable,
    Finished,
    Flinch,
    ApplyBundle {
        key: String,
        overrides: Vec<OverrideSpec>,
    },
    RemoveBundle {
        key: String,
    },
}

impl CommandSpec {
    pub fn to_command(&self) -> LoadResult<CharacterCommand> {
        Ok(match self {
            CommandSpec::Attack(name) => CharacterCommand::RequestAttack(name.clone()),
            CommandSpec::Committal => CharacterCommand::CommittalSignal,
            CommandSpec::Bufferable => CharacterCommand::BufferableSignal,
            CommandSpec::Finished => CharacterCommand::FinishedSignal,
            CommandSpec::Flinch => CharacterCommand::Flinch,
            CommandSpec::ApplyBundle { key, overrides } => CharacterCommand::ApplyBundle {
                key: key.clone(),
                bundle: resolve_bundle(overrides)
                    .map_err(|e| anyhow::anyhow!("Bundle '{}': {}", key, e))?,
            },
            CommandSpec::RemoveBundle { key } => CharacterCommand::RemoveBundle { key: key.clone() },
        })
    }
}

/// A command delivered before the given tick runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub tick: u64,
    pub command: CommandSpec,
}

/// Top-level scenario document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    /// Profile path, relative to the content directory.
    pub profile: String,
    /// Attack library path, relative to the content directory.
    #[serde(default)]
    pub attacks: Option<String>,
    pub ticks: u64,
    #[serde(default)]
    pub start: StartSpec,
    #[serde(default)]
    pub world: WorldSpec,
    #[serde(default)]
    pub input: Vec<InputSpan>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl ScenarioSpec {
    /// Input for `tick`. When spans overlap the last one listed wins.
    pub fn input_at(&self, tick: u64) -> MovementInput {
        self.input
            .iter()
            .rev()
            .find(|span| span.covers(tick))
            .map(|span| MovementInput {
                move_axis: span.move_axis,
                jump: span.jump,
            })
            .unwrap_or(MovementInput::IDLE)
    }

    /// Events scheduled for `tick`, in authored order.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &ScenarioEvent> + '_ {
        self.events.iter().filter(move |event| event.tick == tick)
    }

    pub fn validate(&self) -> LoadResult<()> {
        if self.ticks == 0 {
            return Err(anyhow::anyhow!("Scenario '{}' runs for zero ticks", self.name));
        }
        for span in &self.input {
            if span.from > span.until {
                return Err(anyhow::anyhow!(
                    "Scenario '{}': input span {}..{} is reversed",
                    self.name,
                    span.from,
                    span.until
                ));
            }
            if !(-1.0..=1.0).contains(&span.move_axis) {
                return Err(anyhow::anyhow!(
                    "Scenario '{}': move_axis {} outside [-1, 1]",
                    self.name,
                    span.move_axis
                ));
            }
        }
        if !(-60.0..=60.0).contains(&self.world.floor_slope) {
            return Err(anyhow::anyhow!(
                "Scenario '{}': floor slope {} outside [-60, 60]",
                self.name,
                self.world.floor_slope
            ));
        }
        for event in &self.events {
            event.command.to_command()?;
        }
        Ok(())
    }
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioSpec> {
        let scenario: ScenarioSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        scenario.validate()?;
        tracing::debug!(
            name = %scenario.name,
            ticks = scenario.ticks,
            events = scenario.events.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }
}
