//! Passing through surfaces tagged permeable.

use glam::Vec3;
use tracing::debug;

use super::{Ability, AbilityContext};
use crate::overrides::{BundleReceipt, OverrideBundle};
use crate::physics::{Collider, ColliderId, MotorEvent, NegationFlags};
use crate::schedule::{FiredTimer, RestartableTimer, TimerEvent};
use crate::values::{PermeationValues, PhysicsValues, ValueSet};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum PermeationPhase {
    #[default]
    Ready,
    Permeating,
    Cooldown,
}

/// Dives through a permeable surface hit at speed, then pops out the far side
/// with a boost.
#[derive(Clone, Debug)]
pub struct SurfacePermeation {
    phase: PermeationPhase,
    surface: Option<ColliderId>,
    direction: Vec3,
    /// Velocity before this tick's sweep, used to judge an impact.
    approach: Vec3,
    bundle: OverrideBundle,
    receipt: Option<BundleReceipt>,
    duration: RestartableTimer,
    cooldown: RestartableTimer,
}

impl SurfacePermeation {
    pub fn new() -> Self {
        let weightless = PhysicsValues {
            static_friction_speed: 0.0,
            kinetic_friction: 0.0,
            extra_kinetic_friction: 0.0,
            air_drag: 0.0,
            extra_air_drag: 0.0,
            gravity: Vec3::ZERO,
            ..PhysicsValues::unset()
        };
        Self {
            phase: PermeationPhase::Ready,
            surface: None,
            direction: Vec3::ZERO,
            approach: Vec3::ZERO,
            bundle: OverrideBundle::new().set(weightless),
            receipt: None,
            duration: RestartableTimer::new(),
            cooldown: RestartableTimer::new(),
        }
    }

    pub fn phase(&self) -> PermeationPhase {
        self.phase
    }

    /// Collider currently being passed through.
    pub fn surface(&self) -> Option<ColliderId> {
        self.surface
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    fn constants(ctx: &AbilityContext<'_>) -> PermeationValues {
        ctx.registry.current_or_default::<PermeationValues>()
    }

    fn enter(&mut self, ctx: &mut AbilityContext<'_>, collider: ColliderId, constants: &PermeationValues) {
        let speed = self.approach.length();
        self.direction = self.approach / speed;
        self.surface = Some(collider);
        self.phase = PermeationPhase::Permeating;
        self.receipt = Some(ctx.registry.apply_bundle(&self.bundle));

        let iframes = ctx.config.ticks_for(constants.invulnerability);
        ctx.vulnerability.grant(&mut *ctx.scheduler, iframes);
        let limit = ctx.config.ticks_for(constants.max_duration);
        self.duration
            .restart(&mut *ctx.scheduler, limit, TimerEvent::PermeationExpired);

        ctx.state.velocity = self.direction * speed.max(constants.min_speed);
        debug!(target: "kinetic::ability", %collider, speed, "permeation entered");
    }

    fn exit(&mut self, ctx: &mut AbilityContext<'_>) {
        let constants = Self::constants(ctx);
        if let Some(receipt) = self.receipt.take() {
            ctx.registry.remove_bundle(receipt);
        }
        self.duration.cancel(&mut *ctx.scheduler);
        ctx.state.velocity += self.direction * constants.exit_boost;

        let cooldown = ctx.config.ticks_for(constants.cooldown);
        self.cooldown
            .restart(&mut *ctx.scheduler, cooldown, TimerEvent::PermeationReady);
        self.phase = PermeationPhase::Cooldown;
        debug!(
            target: "kinetic::ability",
            surface = ?self.surface,
            cooldown,
            "permeation exited"
        );
        self.surface = None;
    }
}

impl Default for SurfacePermeation {
    fn default() -> Self {
        Self::new()
    }
}

impl Ability for SurfacePermeation {
    fn name(&self) -> &'static str {
        "surface_permeation"
    }

    fn update_velocity(&mut self, ctx: &mut AbilityContext<'_>) {
        self.approach = ctx.state.velocity;
        if self.phase != PermeationPhase::Permeating {
            return;
        }
        ctx.integrator
            .negate(NegationFlags::FRICTION | NegationFlags::DRAG | NegationFlags::GRAVITY);
        let constants = Self::constants(ctx);
        let speed = ctx.state.velocity.dot(self.direction).max(constants.min_speed);
        ctx.state.velocity = self.direction * speed;
    }

    fn is_collider_valid(&self, collider: &Collider) -> bool {
        self.phase != PermeationPhase::Permeating || self.surface != Some(collider.id)
    }

    fn on_motor_event(&mut self, ctx: &mut AbilityContext<'_>, event: &MotorEvent) {
        let MotorEvent::MovementHit(hit) = event else {
            return;
        };
        if self.phase != PermeationPhase::Ready || !hit.collider.is_permeable() {
            return;
        }
        let constants = Self::constants(ctx);
        let into_surface = self.approach.dot(hit.normal) < 0.0;
        if into_surface && self.approach.length() >= constants.entry_speed {
            self.enter(ctx, hit.collider.id, &constants);
        }
    }

    fn on_timer(&mut self, ctx: &mut AbilityContext<'_>, timer: FiredTimer) -> bool {
        match timer.event {
            TimerEvent::PermeationExpired if self.duration.claim(timer.handle) => {
                if self.phase == PermeationPhase::Permeating {
                    self.exit(ctx);
                }
                true
            }
            TimerEvent::PermeationReady if self.cooldown.claim(timer.handle) => {
                self.phase = PermeationPhase::Ready;
                debug!(target: "kinetic::ability", "permeation ready");
                true
            }
            _ => false,
        }
    }

    fn on_overlap_ended(&mut self, ctx: &mut AbilityContext<'_>, collider: ColliderId) {
        if self.phase == PermeationPhase::Permeating && self.surface == Some(collider) {
            self.exit(ctx);
        }
    }

    fn shutdown(&mut self, ctx: &mut AbilityContext<'_>) {
        if let Some(receipt) = self.receipt.take() {
            ctx.registry.remove_bundle(receipt);
        }
        self.duration.cancel(&mut *ctx.scheduler);
        self.cooldown.cancel(&mut *ctx.scheduler);
        self.surface = None;
        self.phase = PermeationPhase::Ready;
    }
}
