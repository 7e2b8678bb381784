//! One character's components and the fixed per-tick order that drives them.
//!
//! Tick order:
//!
//! 1. fire due timers (vulnerability first, then abilities)
//! 2. drain queued [`CharacterCommand`]s in FIFO order
//! 3. sample grounding from the motor
//! 4. ability `pre_update`
//! 5. rotation, ability `update_velocity`, locomotion, integrator
//! 6. hand the velocity to the motor and sweep, with the character as filter
//! 7. record the sweep, `post_grounding` everywhere, dispatch motor events
//! 8. ability `post_update`

mod command;
mod profile;

pub use command::{CharacterCommand, TickReport};
pub use profile::CharacterProfile;

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::abilities::{Ability, AbilityContext, SurfacePermeation};
use crate::combat::{
    AttackEvent, AttackEvents, AttackLibrary, AttackState, AttackStateMachine, Vulnerability,
};
use crate::config::SimConfig;
use crate::overrides::{BundleReceipt, OverridableAttribute, OverrideRegistry, RegistryError};
use crate::physics::{
    Collider, CollisionFilter, Locomotion, Motor, MovementInput, MovementState,
    PlanarPhysicsIntegrator,
};
use crate::schedule::{Scheduler, TickScheduler};
use crate::values::{ActionInputValues, MovementValues, PhysicsValues};

/// Builds an [`AbilityContext`] from disjoint fields of a character so the
/// ability list can be iterated mutably at the same time.
macro_rules! ability_context {
    ($character:ident, $scheduler:ident, $dt:expr) => {
        AbilityContext {
            state: &mut $character.state,
            registry: &mut $character.registry,
            integrator: &mut $character.integrator,
            scheduler: &mut *$scheduler,
            vulnerability: &mut $character.vulnerability,
            config: &$character.config,
            dt: $dt,
        }
    };
}

/// Calls one hook on every ability, in registration order.
macro_rules! for_each_ability {
    ($character:ident, $scheduler:ident, $dt:expr, $hook:ident $(, $arg:expr)*) => {
        for ability in $character.abilities.iter_mut() {
            let mut ctx = ability_context!($character, $scheduler, $dt);
            ability.$hook(&mut ctx $(, $arg)*);
        }
    };
}

pub struct Character {
    name: String,
    config: SimConfig,
    state: MovementState,
    registry: OverrideRegistry,
    integrator: PlanarPhysicsIntegrator,
    locomotion: Locomotion,
    attack: AttackStateMachine,
    library: Arc<AttackLibrary>,
    vulnerability: Vulnerability,
    abilities: Vec<Box<dyn Ability>>,
    commands: VecDeque<CharacterCommand>,
    scripted: BTreeMap<String, BundleReceipt>,
}

impl Character {
    /// Registers the profile's constants and the abilities it enables.
    ///
    /// # Errors
    ///
    /// Propagates [`RegistryError`] from attribute registration.
    pub fn new(
        profile: &CharacterProfile,
        library: Arc<AttackLibrary>,
        config: SimConfig,
    ) -> Result<Self, RegistryError> {
        let mut registry = OverrideRegistry::new();
        registry.register(OverridableAttribute::new(profile.physics))?;
        registry.register(OverridableAttribute::new(profile.movement))?;
        registry.register(OverridableAttribute::new(profile.action_input))?;

        let mut abilities: Vec<Box<dyn Ability>> = Vec::new();
        if let Some(permeation) = profile.permeation {
            registry.register(OverridableAttribute::new(permeation))?;
            abilities.push(Box::new(SurfacePermeation::new()));
        }

        debug!(
            target: "kinetic::character",
            name = %profile.name,
            abilities = abilities.len(),
            attacks = library.len(),
            "character created"
        );
        Ok(Self {
            name: profile.name.clone(),
            config,
            state: MovementState::default(),
            registry,
            integrator: PlanarPhysicsIntegrator::new(),
            locomotion: Locomotion::new(),
            attack: AttackStateMachine::new(),
            library,
            vulnerability: Vulnerability::new(),
            abilities,
            commands: VecDeque::new(),
            scripted: BTreeMap::new(),
        })
    }

    pub fn with_ability(mut self, ability: Box<dyn Ability>) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MovementState {
        &mut self.state
    }

    pub fn registry(&self) -> &OverrideRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut OverrideRegistry {
        &mut self.registry
    }

    pub fn attack(&self) -> &AttackStateMachine {
        &self.attack
    }

    pub fn vulnerability(&self) -> &Vulnerability {
        &self.vulnerability
    }

    pub fn ability_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.abilities.iter().map(|ability| ability.name())
    }

    /// Queues a command for the start of the next tick.
    pub fn enqueue(&mut self, command: CharacterCommand) {
        self.commands.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Grants invulnerability frames, restarting any running window.
    pub fn grant_invulnerability<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, seconds: f32) {
        let ticks = self.config.ticks_for(seconds);
        self.vulnerability.grant(scheduler, ticks);
    }

    /// Runs one fixed step.
    pub fn tick<M: Motor + ?Sized>(
        &mut self,
        motor: &mut M,
        scheduler: &mut TickScheduler,
        input: MovementInput,
        dt: f32,
    ) -> TickReport {
        let mut attack_events = Vec::new();
        let mut rejected_commands = 0;

        for timer in scheduler.advance() {
            if self.vulnerability.on_timer(timer.handle, timer.event) {
                debug!(target: "kinetic::character", name = %self.name, "invulnerability ended");
                continue;
            }
            let mut claimed = false;
            for ability in self.abilities.iter_mut() {
                let mut ctx = ability_context!(self, scheduler, dt);
                if ability.on_timer(&mut ctx, timer) {
                    claimed = true;
                    break;
                }
            }
            if !claimed {
                trace!(target: "kinetic::character", event = %timer.event, "unclaimed timer");
            }
        }

        while let Some(command) = self.commands.pop_front() {
            if !self.handle_command(command, scheduler, dt, &mut attack_events) {
                rejected_commands += 1;
            }
        }

        self.state.sample_contact(&*motor);
        let grounded_before = self.state.grounded;
        for_each_ability!(self, scheduler, dt, pre_update);

        PlanarPhysicsIntegrator::integrate_rotation(&mut self.state, dt);
        for_each_ability!(self, scheduler, dt, update_velocity);
        let movement = self.registry.current_or_default::<MovementValues>();
        let gates = self.registry.current_or_default::<ActionInputValues>();
        let physics = self.registry.current_or_default::<PhysicsValues>();
        let locomotion = self.locomotion.apply(
            &mut self.state,
            &mut *motor,
            input,
            &movement,
            &gates,
            physics.gravity,
            dt,
        );
        let integration = self
            .integrator
            .update(&mut self.state, &mut *motor, &physics, dt);

        motor.set_base_velocity(self.state.velocity);
        let motor_events = motor.sweep(dt, &*self);

        self.state.record_sweep(&*motor, grounded_before);
        self.integrator.post_grounding(self.state.grounded);
        for_each_ability!(self, scheduler, dt, post_grounding);
        for event in &motor_events {
            for_each_ability!(self, scheduler, dt, on_motor_event, event);
        }
        for_each_ability!(self, scheduler, dt, post_update);

        if self.state.just_landed() {
            debug!(target: "kinetic::character", name = %self.name, "landed");
        }

        TickReport {
            tick: scheduler.now(),
            attack_events,
            motor_events: motor_events.len(),
            grounded: self.state.grounded,
            jumped: locomotion.jumped,
            integration,
            rejected_commands,
        }
    }

    /// Pops every live layer the character owns and cancels its timers.
    pub fn shutdown(&mut self, scheduler: &mut TickScheduler) {
        self.attack.shutdown(&mut self.registry);
        for_each_ability!(self, scheduler, 0.0, shutdown);
        for (_, receipt) in std::mem::take(&mut self.scripted) {
            self.registry.remove_bundle(receipt);
        }
        self.vulnerability.revoke(scheduler);
        self.commands.clear();
        debug!(
            target: "kinetic::character",
            name = %self.name,
            pristine = self.registry.is_pristine(),
            "character shut down"
        );
    }

    /// Returns `false` when the command was refused.
    fn handle_command(
        &mut self,
        command: CharacterCommand,
        scheduler: &mut TickScheduler,
        dt: f32,
        events: &mut Vec<AttackEvent>,
    ) -> bool {
        trace!(target: "kinetic::character", command = command.as_ref(), "command");
        let emitted: AttackEvents = match command {
            CharacterCommand::RequestAttack(name) => {
                // The lock only blocks fresh attacks; cancels and buffering go
                // through while the running attack holds it.
                let gates = self.registry.current_or_default::<ActionInputValues>();
                if self.attack.state() == AttackState::Finished && !gates.attack_allowed() {
                    debug!(target: "kinetic::character", attack = %name, "attack input locked");
                    return false;
                }
                match self.attack.request(&name, &self.library, &mut self.registry) {
                    Ok(emitted) => emitted,
                    Err(err) => {
                        warn!(target: "kinetic::character", error = %err, "attack request rejected");
                        return false;
                    }
                }
            }
            CharacterCommand::CommittalSignal => self.attack.on_committal_signal(&self.library),
            CharacterCommand::BufferableSignal => self.attack.on_bufferable_signal(),
            CharacterCommand::FinishedSignal => {
                self.attack.on_finished_signal(&self.library, &mut self.registry)
            }
            CharacterCommand::Flinch => self.attack.flinch(&mut self.registry),
            CharacterCommand::ApplyBundle { key, bundle } => {
                if let Some(previous) = self.scripted.remove(&key) {
                    self.registry.remove_bundle(previous);
                }
                let receipt = self.registry.apply_bundle(&bundle);
                debug!(
                    target: "kinetic::character",
                    %key,
                    applied = receipt.applied().len(),
                    skipped = receipt.skipped(),
                    "scripted bundle applied"
                );
                self.scripted.insert(key, receipt);
                AttackEvents::new()
            }
            CharacterCommand::RemoveBundle { key } => match self.scripted.remove(&key) {
                Some(receipt) => {
                    self.registry.remove_bundle(receipt);
                    AttackEvents::new()
                }
                None => {
                    warn!(target: "kinetic::character", %key, "no scripted bundle to remove");
                    return false;
                }
            },
            CharacterCommand::OverlapEnded(collider) => {
                for_each_ability!(self, scheduler, dt, on_overlap_ended, collider);
                AttackEvents::new()
            }
        };
        events.extend(emitted);
        true
    }
}

impl CollisionFilter for Character {
    fn is_collider_valid_for_collisions(&self, collider: &Collider) -> bool {
        self.abilities
            .iter()
            .all(|ability| ability.is_collider_valid(collider))
    }
}
