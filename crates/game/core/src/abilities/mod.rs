//! Pluggable character abilities.
//!
//! An ability hooks into fixed points of the character tick. It reshapes
//! movement only through the registry and the integrator's negation flags,
//! never by reaching into another component.

pub mod permeation;

pub use permeation::{PermeationPhase, SurfacePermeation};

use crate::config::SimConfig;
use crate::combat::Vulnerability;
use crate::overrides::OverrideRegistry;
use crate::physics::{Collider, ColliderId, MotorEvent, MovementState, PlanarPhysicsIntegrator};
use crate::schedule::{FiredTimer, Scheduler};

/// Everything an ability may touch during a hook.
pub struct AbilityContext<'a> {
    pub state: &'a mut MovementState,
    pub registry: &'a mut OverrideRegistry,
    pub integrator: &'a mut PlanarPhysicsIntegrator,
    pub scheduler: &'a mut dyn Scheduler,
    pub vulnerability: &'a mut Vulnerability,
    pub config: &'a SimConfig,
    pub dt: f32,
}

/// Tick hooks, called in the character's fixed order. All are optional.
pub trait Ability {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// After grounding has been sampled from the motor.
    fn pre_update(&mut self, _ctx: &mut AbilityContext<'_>) {}

    /// Before locomotion and integration; the place to raise negation flags.
    fn update_velocity(&mut self, _ctx: &mut AbilityContext<'_>) {}

    /// Consulted by the motor during the sweep.
    fn is_collider_valid(&self, _collider: &Collider) -> bool {
        true
    }

    /// After the sweep, once grounding flags are final.
    fn post_grounding(&mut self, _ctx: &mut AbilityContext<'_>) {}

    /// For each contact the sweep reported, in order.
    fn on_motor_event(&mut self, _ctx: &mut AbilityContext<'_>, _event: &MotorEvent) {}

    /// Last hook of the tick.
    fn post_update(&mut self, _ctx: &mut AbilityContext<'_>) {}

    /// A scheduler timer fired. Returns `true` when this ability owned it.
    fn on_timer(&mut self, _ctx: &mut AbilityContext<'_>, _timer: FiredTimer) -> bool {
        false
    }

    /// Glue reports the character stopped overlapping `collider`.
    fn on_overlap_ended(&mut self, _ctx: &mut AbilityContext<'_>, _collider: ColliderId) {}

    /// Character teardown: pop every live layer and cancel timers.
    fn shutdown(&mut self, _ctx: &mut AbilityContext<'_>) {}
}
