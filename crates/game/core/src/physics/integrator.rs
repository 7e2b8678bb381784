//! Grounded and airborne velocity integration on the movement plane.

use glam::{Quat, Vec3};
use tracing::debug;

use super::plane::{angle_deg, decelerate, project_on_plane};
use super::{Motor, MovementState, NegationFlags};
use crate::values::PhysicsValues;

/// Which branch the integrator took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Branch {
    Grounded,
    Airborne,
}

/// Summary of one integration step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegrationReport {
    pub branch: Branch,
    /// Static friction pinned the character this tick.
    pub static_friction: bool,
    /// An instability asked the motor to leave the ground.
    pub forced_unground: bool,
}

impl IntegrationReport {
    fn new(branch: Branch) -> Self {
        Self {
            branch,
            static_friction: false,
            forced_unground: false,
        }
    }
}

/// Integrates a character's velocity from the resolved physics constants.
///
/// Owns the one-shot negation flags and the two instability timers. Every
/// other input arrives per call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanarPhysicsIntegrator {
    negation: NegationFlags,
    upside_down_time: f32,
    sideways_time: f32,
}

impl PlanarPhysicsIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the given terms for the next integration only.
    pub fn negate(&mut self, flags: NegationFlags) {
        self.negation |= flags;
    }

    pub fn negation(&self) -> NegationFlags {
        self.negation
    }

    pub fn upside_down_time(&self) -> f32 {
        self.upside_down_time
    }

    pub fn sideways_time(&self) -> f32 {
        self.sideways_time
    }

    /// Advances `state.rotation` by the current angular velocity.
    pub fn integrate_rotation(state: &mut MovementState, dt: f32) {
        if state.angular_velocity == Vec3::ZERO {
            return;
        }
        let delta = Quat::from_scaled_axis(state.angular_velocity * dt);
        state.rotation = (delta * state.rotation).normalize();
    }

    /// Runs one integration step on `state`, branching on `state.grounded`.
    ///
    /// Clears the negation flags before returning.
    pub fn update<M: Motor + ?Sized>(
        &mut self,
        state: &mut MovementState,
        motor: &mut M,
        constants: &PhysicsValues,
        dt: f32,
    ) -> IntegrationReport {
        let report = if state.grounded {
            self.integrate_grounded(state, motor, constants, dt)
        } else {
            self.integrate_airborne(state, constants, dt)
        };

        let axis = state.plane_normal;
        let mut angular = axis * state.angular_velocity.dot(axis);
        if !self.negation.contains(NegationFlags::DRAG) {
            angular = decelerate(angular, constants.angular_drag * dt);
        }
        state.angular_velocity = angular;
        state.velocity = project_on_plane(state.velocity, axis);

        self.negation = NegationFlags::empty();
        report
    }

    /// Called after the sweep with its grounding result.
    pub fn post_grounding(&mut self, grounded: bool) {
        if !grounded {
            self.upside_down_time = 0.0;
            self.sideways_time = 0.0;
        }
    }

    fn integrate_grounded<M: Motor + ?Sized>(
        &mut self,
        state: &mut MovementState,
        motor: &mut M,
        c: &PhysicsValues,
        dt: f32,
    ) -> IntegrationReport {
        let mut report = IntegrationReport::new(Branch::Grounded);
        let friction_negated = self.negation.contains(NegationFlags::FRICTION);
        let mut gravity_negated = self.negation.contains(NegationFlags::GRAVITY);

        let gravity_magnitude = c.gravity.length();
        let gravity_dir = c.gravity.normalize_or_zero();
        let normal = state.ground_normal;
        let slope_angle = angle_deg(-gravity_dir, normal);
        let mut velocity = state.velocity;

        if !friction_negated {
            let speed = velocity.length();
            if slope_angle < c.static_friction_max_slope && speed < c.static_friction_speed {
                velocity = Vec3::ZERO;
                gravity_negated = true;
                report.static_friction = true;
            } else if speed > 0.0 {
                velocity = decelerate(velocity, c.kinetic_friction * dt);
            }
        }

        let overhang = normal.dot(gravity_dir);
        if overhang > 0.0 {
            self.upside_down_time += dt;
            if self.upside_down_time > c.upside_down_duration {
                let amount = gravity_magnitude * overhang * c.upside_down_deceleration * dt;
                velocity = decelerate(velocity, amount);
                if velocity.length() < c.attach_speed {
                    report.forced_unground = true;
                }
            }
        } else {
            self.upside_down_time = 0.0;
            if !friction_negated && velocity.length() > c.extra_kinetic_friction_speed {
                let ratio = (slope_angle / 90.0).clamp(0.0, 1.0);
                velocity = decelerate(velocity, c.extra_kinetic_friction * ratio * dt);
            }
        }

        // sin of the plane's tilt away from vertical
        let axis_alignment = state.plane_normal.dot(gravity_dir).abs();
        let tilt = axis_alignment.min(1.0).asin().to_degrees();
        if tilt > motor.max_stable_slope_angle() {
            self.sideways_time += dt;
            if self.sideways_time > c.sideways_duration {
                let amount = gravity_magnitude * axis_alignment * c.sideways_deceleration * dt;
                velocity = decelerate(velocity, amount);
                if velocity.length() < c.attach_speed {
                    report.forced_unground = true;
                }
            }
        } else {
            self.sideways_time = 0.0;
        }

        if report.forced_unground {
            debug!(
                target: "kinetic::physics",
                upside_down = self.upside_down_time,
                sideways = self.sideways_time,
                "instability forced unground"
            );
            motor.force_unground();
            if !gravity_negated {
                velocity += c.gravity * dt;
            }
        } else {
            if !gravity_negated {
                let along_ground = project_on_plane(c.gravity, normal);
                let scale = if velocity.dot(along_ground) >= 0.0 {
                    c.downhill_gravity_scale
                } else {
                    c.uphill_gravity_scale
                };
                velocity += along_ground * scale * dt;
            }
            if c.constant_acceleration != Vec3::ZERO {
                velocity += project_on_plane(c.constant_acceleration, normal) * dt;
            }
        }

        state.velocity = velocity;
        report
    }

    fn integrate_airborne(
        &mut self,
        state: &mut MovementState,
        c: &PhysicsValues,
        dt: f32,
    ) -> IntegrationReport {
        let gravity_dir = c.gravity.normalize_or_zero();
        let mut along = state.velocity.dot(gravity_dir);
        let mut lateral = state.velocity - gravity_dir * along;

        if !self.negation.contains(NegationFlags::DRAG) {
            lateral = decelerate(lateral, c.air_drag * dt);
            if lateral.length() > c.extra_air_drag_speed {
                lateral = decelerate(lateral, c.extra_air_drag * dt);
            }
        }

        if along > c.terminal_velocity {
            along = (along - c.terminal_deceleration * dt).max(c.terminal_velocity);
        } else if !self.negation.contains(NegationFlags::GRAVITY) {
            along = (along + c.gravity.length() * dt).min(c.terminal_velocity);
        }

        state.velocity = lateral + gravity_dir * along + c.constant_acceleration * dt;
        IntegrationReport::new(Branch::Airborne)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::testing::StubMotor;

    const DT: f32 = 0.1;

    fn grounded_state(velocity: Vec3) -> MovementState {
        let mut state = MovementState::new(Vec3::ZERO, Vec3::Z).with_velocity(velocity);
        state.grounded = true;
        state.ground_normal = Vec3::Y;
        state
    }

    #[test]
    fn kinetic_friction_reduces_speed_without_reversing() {
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded_state(Vec3::new(10.0, 0.0, 0.0));

        let report = integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);

        assert_eq!(report.branch, Branch::Grounded);
        assert!(!report.static_friction);
        assert!((state.velocity.x - 8.5).abs() < 1e-5);
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn heavy_friction_stops_at_zero() {
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded_state(Vec3::new(1.0, 0.0, 0.0));

        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);

        assert_eq!(state.velocity, Vec3::ZERO);
    }

    #[test]
    fn static_friction_pins_and_negates_gravity() {
        let constants = PhysicsValues {
            static_friction_speed: 11.0,
            ..PhysicsValues::default()
        };
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded_state(Vec3::new(10.0, 0.0, 0.0));

        let report = integrator.update(&mut state, &mut motor, &constants, DT);

        assert!(report.static_friction);
        assert_eq!(state.velocity, Vec3::ZERO);
    }

    #[test]
    fn negated_friction_keeps_speed() {
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded_state(Vec3::new(10.0, 0.0, 0.0));

        integrator.negate(NegationFlags::FRICTION);
        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);
        assert_eq!(state.velocity, Vec3::new(10.0, 0.0, 0.0));

        // flags are one-shot
        assert!(integrator.negation().is_empty());
        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);
        assert!(state.velocity.x < 10.0);
    }

    #[test]
    fn slope_gravity_uses_downhill_and_uphill_scales() {
        let constants = PhysicsValues {
            kinetic_friction: 0.0,
            static_friction_speed: 0.0,
            downhill_gravity_scale: 2.0,
            uphill_gravity_scale: 0.5,
            ..PhysicsValues::default()
        };
        let normal = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let downhill = project_on_plane(constants.gravity, normal);

        let mut motor = StubMotor::grounded();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut going_down = grounded_state(downhill.normalize());
        going_down.ground_normal = normal;
        integrator.update(&mut going_down, &mut motor, &constants, DT);
        let gained = going_down.velocity - downhill.normalize();
        assert!(gained.abs_diff_eq(downhill * 2.0 * DT, 1e-4));

        let mut going_up = grounded_state(-downhill.normalize() * 5.0);
        going_up.ground_normal = normal;
        integrator.update(&mut going_up, &mut motor, &constants, DT);
        let gained = going_up.velocity + downhill.normalize() * 5.0;
        assert!(gained.abs_diff_eq(downhill * 0.5 * DT, 1e-4));
    }

    #[test]
    fn ceiling_contact_eventually_forces_unground() {
        let constants = PhysicsValues {
            static_friction_speed: 0.0,
            kinetic_friction: 0.0,
            ..PhysicsValues::default()
        };
        let mut motor = StubMotor::grounded();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = grounded_state(Vec3::new(3.0, 0.0, 0.0));
        state.ground_normal = Vec3::NEG_Y;

        let mut forced = false;
        for _ in 0..5 {
            forced |= integrator.update(&mut state, &mut motor, &constants, DT).forced_unground;
        }

        assert!(forced);
        assert!(motor.unground_requests > 0);
        assert!(state.velocity.y < 0.0, "full gravity applied to detach");
    }

    #[test]
    fn sideways_plane_decelerates_then_forces_unground() {
        let constants = PhysicsValues {
            static_friction_speed: 0.0,
            kinetic_friction: 0.0,
            extra_kinetic_friction: 0.0,
            ..PhysicsValues::default()
        };
        // plane leaning 45 degrees away from vertical
        let plane_normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let mut motor = StubMotor::grounded();
        motor.plane_axis = plane_normal;
        motor.max_slope = 30.0;
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = grounded_state(Vec3::new(10.0, 0.0, 0.0));
        state.plane_normal = plane_normal;
        state.ground_normal = Vec3::new(0.0, 1.0, -1.0).normalize();

        for _ in 0..2 {
            let report = integrator.update(&mut state, &mut motor, &constants, DT);
            assert!(!report.forced_unground);
        }
        assert!((integrator.sideways_time() - 0.2).abs() < 1e-5);
        assert!((state.velocity.x - 10.0).abs() < 1e-4, "no braking before the duration");

        integrator.update(&mut state, &mut motor, &constants, DT);
        let braking = 30.0 * core::f32::consts::FRAC_1_SQRT_2 * DT;
        assert!((state.velocity.x - (10.0 - braking)).abs() < 1e-3);
        assert_eq!(motor.unground_requests, 0);

        let report = integrator.update(&mut state, &mut motor, &constants, DT);
        assert!(report.forced_unground);
        assert_eq!(motor.unground_requests, 1);
        assert!(state.velocity.x < constants.attach_speed);

        integrator.post_grounding(false);
        assert_eq!(integrator.sideways_time(), 0.0);
    }

    #[test]
    fn upright_plane_resets_the_sideways_timer() {
        let plane_normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let mut motor = StubMotor::grounded();
        motor.max_slope = 30.0;
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = grounded_state(Vec3::new(10.0, 0.0, 0.0));
        state.plane_normal = plane_normal;
        state.ground_normal = Vec3::new(0.0, 1.0, -1.0).normalize();

        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);
        assert!(integrator.sideways_time() > 0.0);

        state.plane_normal = Vec3::Z;
        state.ground_normal = Vec3::Y;
        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);
        assert_eq!(integrator.sideways_time(), 0.0);
    }

    #[test]
    fn extra_kinetic_friction_scales_with_slope() {
        let constants = PhysicsValues {
            static_friction_speed: 0.0,
            kinetic_friction: 0.0,
            ..PhysicsValues::default()
        };
        let normal = Vec3::new(-1.0, 1.0, 0.0).normalize();
        let along_slope = Vec3::new(1.0, 1.0, 0.0).normalize();
        let mut motor = StubMotor::grounded();
        let mut integrator = PlanarPhysicsIntegrator::new();

        // 45 degrees is half of the full ratio
        let mut fast = grounded_state(along_slope * 25.0);
        fast.ground_normal = normal;
        integrator.negate(NegationFlags::GRAVITY);
        integrator.update(&mut fast, &mut motor, &constants, DT);
        let expected = 25.0 - constants.extra_kinetic_friction * 0.5 * DT;
        assert!((fast.velocity.length() - expected).abs() < 1e-3);

        let mut slow = grounded_state(along_slope * 15.0);
        slow.ground_normal = normal;
        integrator.negate(NegationFlags::GRAVITY);
        integrator.update(&mut slow, &mut motor, &constants, DT);
        assert!((slow.velocity.length() - 15.0).abs() < 1e-4);

        let mut flat = grounded_state(Vec3::new(25.0, 0.0, 0.0));
        integrator.negate(NegationFlags::GRAVITY);
        integrator.update(&mut flat, &mut motor, &constants, DT);
        assert!((flat.velocity.x - 25.0).abs() < 1e-4);
    }

    #[test]
    fn grounded_constant_acceleration_follows_the_ground() {
        let constants = PhysicsValues {
            constant_acceleration: Vec3::new(10.0, 0.0, 0.0),
            ..PhysicsValues::default()
        };
        let mut motor = StubMotor::grounded();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = grounded_state(Vec3::ZERO);
        state.ground_normal = Vec3::new(-1.0, 1.0, 0.0).normalize();

        integrator.negate(NegationFlags::FRICTION | NegationFlags::GRAVITY);
        integrator.update(&mut state, &mut motor, &constants, DT);

        assert!(state.velocity.abs_diff_eq(Vec3::new(0.5, 0.5, 0.0), 1e-5));
    }

    #[test]
    fn airborne_constant_acceleration_is_unscaled() {
        let constants = PhysicsValues {
            constant_acceleration: Vec3::new(10.0, 5.0, 0.0),
            ..PhysicsValues::default()
        };
        let mut motor = StubMotor::airborne();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = MovementState::default();

        integrator.negate(NegationFlags::GRAVITY);
        integrator.update(&mut state, &mut motor, &constants, DT);

        assert!(state.velocity.abs_diff_eq(Vec3::new(1.0, 0.5, 0.0), 1e-5));
    }

    #[test]
    fn extra_air_drag_applies_past_its_speed() {
        let constants = PhysicsValues::default();
        let mut motor = StubMotor::airborne();
        let mut integrator = PlanarPhysicsIntegrator::new();

        let mut fast = MovementState::default().with_velocity(Vec3::new(30.0, 0.0, 0.0));
        integrator.negate(NegationFlags::GRAVITY);
        integrator.update(&mut fast, &mut motor, &constants, DT);
        let expected = 30.0 - (constants.air_drag + constants.extra_air_drag) * DT;
        assert!((fast.velocity.x - expected).abs() < 1e-4);

        let mut slow = MovementState::default().with_velocity(Vec3::new(10.0, 0.0, 0.0));
        integrator.negate(NegationFlags::GRAVITY);
        integrator.update(&mut slow, &mut motor, &constants, DT);
        assert!((slow.velocity.x - (10.0 - constants.air_drag * DT)).abs() < 1e-4);
    }

    #[test]
    fn post_grounding_resets_timers_when_airborne() {
        let mut motor = StubMotor::grounded();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = grounded_state(Vec3::new(20.0, 0.0, 0.0));
        state.ground_normal = Vec3::NEG_Y;
        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);
        assert!(integrator.upside_down_time() > 0.0);

        integrator.post_grounding(true);
        assert!(integrator.upside_down_time() > 0.0);
        integrator.post_grounding(false);
        assert_eq!(integrator.upside_down_time(), 0.0);
    }

    #[test]
    fn airborne_speed_approaches_terminal_from_above() {
        let constants = PhysicsValues::default();
        let mut motor = StubMotor::airborne();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = MovementState::default().with_velocity(Vec3::new(0.0, -50.0, 0.0));

        let mut previous = 50.0;
        for _ in 0..20 {
            integrator.update(&mut state, &mut motor, &constants, DT);
            let falling = -state.velocity.y;
            assert!(falling <= previous);
            assert!(falling >= constants.terminal_velocity);
            previous = falling;
        }
        assert!((previous - constants.terminal_velocity).abs() < 1e-4);
    }

    #[test]
    fn airborne_gravity_caps_at_terminal() {
        let constants = PhysicsValues::default();
        let mut motor = StubMotor::airborne();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = MovementState::default().with_velocity(Vec3::new(0.0, -39.0, 0.0));

        integrator.update(&mut state, &mut motor, &constants, DT);
        assert!((state.velocity.y + constants.terminal_velocity).abs() < 1e-5);
    }

    #[test]
    fn air_drag_only_touches_lateral_motion() {
        let constants = PhysicsValues::default();
        let mut motor = StubMotor::airborne();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = MovementState::default().with_velocity(Vec3::new(5.0, 0.0, 0.0));

        integrator.negate(NegationFlags::GRAVITY);
        integrator.update(&mut state, &mut motor, &constants, DT);

        assert!((state.velocity.x - 4.8).abs() < 1e-5);
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn velocity_stays_on_the_movement_plane() {
        let mut motor = StubMotor::airborne();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = MovementState::default().with_velocity(Vec3::new(1.0, 2.0, 7.0));
        state.angular_velocity = Vec3::new(3.0, 0.0, 1.0);

        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);

        assert_eq!(state.velocity.z, 0.0);
        assert_eq!(state.angular_velocity.x, 0.0);
        assert_eq!(state.angular_velocity.y, 0.0);
    }

    #[test]
    fn angular_drag_does_not_overshoot() {
        let mut motor = StubMotor::airborne();
        let mut integrator = PlanarPhysicsIntegrator::new();
        let mut state = MovementState::default();
        state.angular_velocity = Vec3::new(0.0, 0.0, 1.0);

        integrator.update(&mut state, &mut motor, &PhysicsValues::default(), DT);
        assert_eq!(state.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn rotation_follows_angular_velocity() {
        let mut state = MovementState::default();
        state.angular_velocity = Vec3::new(0.0, 0.0, core::f32::consts::PI);

        PlanarPhysicsIntegrator::integrate_rotation(&mut state, 0.5);

        assert!(state.up().abs_diff_eq(Vec3::NEG_X, 1e-5));
    }
}
