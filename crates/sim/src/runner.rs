//! Replays a scripted scenario against one character.

use std::sync::Arc;

use anyhow::Context;
use glam::Vec3;
use kinetic_content::ScenarioSpec;
use kinetic_core::{
    AttackEvent, AttackLibrary, Character, CharacterCommand, CharacterProfile, MovementState,
    Motor, SimConfig, Tick, TickScheduler,
};
use tracing::{debug, info, trace};

use crate::motor::{FLOOR_ID, PlaneMotor};

/// Character state recorded after one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickSample {
    pub tick: Tick,
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub invulnerable: bool,
}

/// Outcome of a full scenario run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub scenario: String,
    pub character: String,
    pub ticks: u64,
    pub samples: Vec<TickSample>,
    pub attack_events: Vec<(Tick, AttackEvent)>,
    pub jumps: u32,
    pub landings: u32,
    pub rejected_commands: usize,
    /// Every override layer was popped once the character shut down.
    pub pristine_after_shutdown: bool,
}

impl RunSummary {
    pub fn final_sample(&self) -> Option<&TickSample> {
        self.samples.last()
    }

    pub fn max_speed(&self) -> f32 {
        self.samples
            .iter()
            .map(|sample| sample.velocity.length())
            .fold(0.0, f32::max)
    }
}

/// Drives one character through a scenario on a fixed tick.
pub struct ScenarioRunner {
    scenario: ScenarioSpec,
    config: SimConfig,
    character: Character,
    motor: PlaneMotor,
    scheduler: TickScheduler,
}

impl ScenarioRunner {
    pub fn new(
        scenario: ScenarioSpec,
        profile: &CharacterProfile,
        attacks: AttackLibrary,
        config: SimConfig,
    ) -> anyhow::Result<Self> {
        if scenario.world.walls.iter().any(|wall| wall.id == FLOOR_ID.0) {
            anyhow::bail!("Scenario '{}' reuses the floor collider id", scenario.name);
        }

        let mut character = Character::new(profile, Arc::new(attacks), config.clone())
            .with_context(|| format!("Failed to assemble character '{}'", profile.name))?;

        let mut motor = PlaneMotor::new(&scenario.world);
        motor.place(scenario.start.position, scenario.start.velocity);
        let mut state = MovementState::new(motor.position(), Vec3::Z).with_velocity(motor.velocity());
        state.sample_contact(&motor);
        *character.state_mut() = state;

        Ok(Self {
            scenario,
            config,
            character,
            motor,
            scheduler: TickScheduler::new(),
        })
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn motor(&self) -> &PlaneMotor {
        &self.motor
    }

    /// Runs every scripted tick, then shuts the character down.
    pub fn run(mut self) -> RunSummary {
        let dt = self.config.dt();
        let mut summary = RunSummary {
            scenario: self.scenario.name.clone(),
            character: self.character.name().to_owned(),
            ticks: self.scenario.ticks,
            samples: Vec::with_capacity(self.scenario.ticks as usize),
            attack_events: Vec::new(),
            jumps: 0,
            landings: 0,
            rejected_commands: 0,
            pristine_after_shutdown: false,
        };

        info!(
            scenario = %self.scenario.name,
            character = %summary.character,
            ticks = self.scenario.ticks,
            tick_rate = self.config.tick_rate,
            "scenario started"
        );

        for step in 0..self.scenario.ticks {
            for event in self.scenario.events_at(step) {
                // Commands were validated when the scenario loaded.
                match event.command.to_command() {
                    Ok(command) => self.character.enqueue(command),
                    Err(err) => debug!(tick = step, error = %err, "skipping unresolvable command"),
                }
            }

            let input = self.scenario.input_at(step);
            let report = self
                .character
                .tick(&mut self.motor, &mut self.scheduler, input, dt);

            for collider in self.motor.take_ended_overlaps() {
                self.character.enqueue(CharacterCommand::OverlapEnded(collider));
            }

            let state = self.character.state();
            trace!(
                tick = %report.tick,
                x = state.position.x,
                y = state.position.y,
                vx = state.velocity.x,
                vy = state.velocity.y,
                grounded = report.grounded,
                branch = %report.integration.branch,
                "tick"
            );
            for event in &report.attack_events {
                debug!(tick = %report.tick, ?event, "attack event");
            }

            if report.jumped {
                summary.jumps += 1;
            }
            if state.just_landed() {
                summary.landings += 1;
            }
            summary.rejected_commands += report.rejected_commands;
            summary.attack_events.extend(
                report
                    .attack_events
                    .into_iter()
                    .map(|event| (report.tick, event)),
            );
            summary.samples.push(TickSample {
                tick: report.tick,
                position: state.position,
                velocity: state.velocity,
                grounded: report.grounded,
                invulnerable: self.character.vulnerability().is_invulnerable(),
            });
        }

        self.character.shutdown(&mut self.scheduler);
        summary.pristine_after_shutdown = self.character.registry().is_pristine();

        if let Some(last) = summary.final_sample() {
            info!(
                scenario = %summary.scenario,
                x = last.position.x,
                y = last.position.y,
                speed = last.velocity.length(),
                grounded = last.grounded,
                jumps = summary.jumps,
                rejected = summary.rejected_commands,
                pristine = summary.pristine_after_shutdown,
                "scenario finished"
            );
        }
        summary
    }
}
