//! Turns gathered input into plane-constrained acceleration and jumps.

use glam::Vec3;
use tracing::debug;

use super::plane::{move_towards, project_on_plane, signed_angle};
use super::{Motor, MovementState};
use crate::values::{ActionInputValues, MovementValues};

/// Input gathered by the host for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementInput {
    /// Signed lateral intent in [-1, 1] along the plane's right axis.
    pub move_axis: f32,
    /// Jump pressed this tick.
    pub jump: bool,
}

impl MovementInput {
    pub const IDLE: Self = Self {
        move_axis: 0.0,
        jump: false,
    };

    pub fn moving(move_axis: f32) -> Self {
        Self {
            move_axis,
            jump: false,
        }
    }

    pub fn jumping() -> Self {
        Self {
            move_axis: 0.0,
            jump: true,
        }
    }
}

/// What locomotion did this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocomotionReport {
    pub jumped: bool,
    pub air_jump: bool,
}

/// Per-character locomotion state: only the air-jump counter survives a tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Locomotion {
    air_jumps_used: i32,
}

impl Locomotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn air_jumps_used(&self) -> i32 {
        self.air_jumps_used
    }

    /// Applies `input` to `state`, honouring the `ActionInput` gates.
    ///
    /// A jump clears `state.grounded` so the integrator takes the airborne
    /// branch on the same tick.
    #[allow(clippy::too_many_arguments)]
    pub fn apply<M: Motor + ?Sized>(
        &mut self,
        state: &mut MovementState,
        motor: &mut M,
        input: MovementInput,
        movement: &MovementValues,
        gates: &ActionInputValues,
        gravity: Vec3,
        dt: f32,
    ) -> LocomotionReport {
        let up = -gravity.normalize_or_zero();
        if state.grounded {
            self.air_jumps_used = 0;
        }

        if gates.move_allowed() && input.move_axis != 0.0 {
            self.accelerate(state, input.move_axis.clamp(-1.0, 1.0), movement, up, dt);
        }

        if gates.rotate_allowed() {
            let target_up = if state.grounded { state.ground_normal } else { up };
            let axis = state.plane_normal;
            let angle = signed_angle(state.up(), target_up, axis);
            let limit = movement.max_angular_speed;
            state.angular_velocity = axis * (angle / dt).clamp(-limit, limit);
        }

        let mut report = LocomotionReport::default();
        if input.jump && gates.jump_allowed() {
            if state.grounded {
                report.jumped = true;
            } else if self.air_jumps_used < movement.air_jumps {
                self.air_jumps_used += 1;
                report.jumped = true;
                report.air_jump = true;
            }
        }

        if report.jumped {
            state.velocity = project_on_plane(state.velocity, up) + up * movement.jump_speed;
            if state.grounded {
                motor.force_unground();
                state.grounded = false;
            }
            debug!(
                target: "kinetic::physics",
                air_jump = report.air_jump,
                air_jumps_used = self.air_jumps_used,
                "jump"
            );
        }
        report
    }

    fn accelerate(
        &self,
        state: &mut MovementState,
        axis: f32,
        movement: &MovementValues,
        up: Vec3,
        dt: f32,
    ) {
        let right = up.cross(state.plane_normal).normalize_or_zero();
        let (direction, acceleration, max_speed) = if state.grounded {
            (
                project_on_plane(right, state.ground_normal).normalize_or_zero(),
                movement.ground_acceleration,
                movement.max_ground_speed,
            )
        } else {
            (right, movement.air_acceleration, movement.max_air_speed)
        };

        let current = state.velocity.dot(direction);
        let target = axis * max_speed;
        // Never brake motion that already exceeds the target in the input's
        // direction; friction and drag handle that.
        if current * target.signum() >= target.abs() {
            return;
        }
        let next = move_towards(current, target, acceleration * dt);
        state.velocity += direction * (next - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::testing::StubMotor;

    const GRAVITY: Vec3 = Vec3::new(0.0, -30.0, 0.0);
    const DT: f32 = 0.1;

    fn grounded() -> MovementState {
        let mut state = MovementState::default();
        state.grounded = true;
        state
    }

    #[test]
    fn ground_acceleration_is_limited_per_tick() {
        let mut locomotion = Locomotion::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded();

        locomotion.apply(
            &mut state,
            &mut motor,
            MovementInput::moving(1.0),
            &MovementValues::default(),
            &ActionInputValues::default(),
            GRAVITY,
            DT,
        );

        assert!((state.velocity.x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn acceleration_stops_at_max_speed() {
        let mut locomotion = Locomotion::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded().with_velocity(Vec3::new(-11.0, 0.0, 0.0));

        locomotion.apply(
            &mut state,
            &mut motor,
            MovementInput::moving(-1.0),
            &MovementValues::default(),
            &ActionInputValues::default(),
            GRAVITY,
            DT,
        );
        assert!((state.velocity.x + 12.0).abs() < 1e-5);

        let mut fast = grounded().with_velocity(Vec3::new(20.0, 0.0, 0.0));
        locomotion.apply(
            &mut fast,
            &mut motor,
            MovementInput::moving(1.0),
            &MovementValues::default(),
            &ActionInputValues::default(),
            GRAVITY,
            DT,
        );
        assert_eq!(fast.velocity.x, 20.0);
    }

    #[test]
    fn locked_gates_ignore_input() {
        let mut locomotion = Locomotion::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded();

        let report = locomotion.apply(
            &mut state,
            &mut motor,
            MovementInput {
                move_axis: 1.0,
                jump: true,
            },
            &MovementValues::default(),
            &ActionInputValues::LOCKED,
            GRAVITY,
            DT,
        );

        assert!(!report.jumped);
        assert_eq!(state.velocity, Vec3::ZERO);
        assert!(state.grounded);
    }

    #[test]
    fn grounded_jump_leaves_the_ground() {
        let mut locomotion = Locomotion::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded().with_velocity(Vec3::new(3.0, -1.0, 0.0));

        let report = locomotion.apply(
            &mut state,
            &mut motor,
            MovementInput::jumping(),
            &MovementValues::default(),
            &ActionInputValues::default(),
            GRAVITY,
            DT,
        );

        assert!(report.jumped);
        assert!(!state.grounded);
        assert_eq!(motor.unground_requests, 1);
        assert!(state.velocity.abs_diff_eq(Vec3::new(3.0, 14.0, 0.0), 1e-5));
    }

    #[test]
    fn air_jumps_are_counted() {
        let movement = MovementValues {
            air_jumps: 1,
            ..MovementValues::default()
        };
        let mut locomotion = Locomotion::new();
        let mut motor = StubMotor::airborne();
        let mut state = MovementState::default();

        let first = locomotion.apply(
            &mut state,
            &mut motor,
            MovementInput::jumping(),
            &movement,
            &ActionInputValues::default(),
            GRAVITY,
            DT,
        );
        let second = locomotion.apply(
            &mut state,
            &mut motor,
            MovementInput::jumping(),
            &movement,
            &ActionInputValues::default(),
            GRAVITY,
            DT,
        );

        assert!(first.air_jump);
        assert!(!second.jumped);
        assert_eq!(locomotion.air_jumps_used(), 1);
        assert_eq!(motor.unground_requests, 0);
    }

    #[test]
    fn rotation_aligns_up_with_ground_normal() {
        let mut locomotion = Locomotion::new();
        let mut motor = StubMotor::grounded();
        let mut state = grounded();
        state.ground_normal = Vec3::new(-1.0, 1.0, 0.0).normalize();

        locomotion.apply(
            &mut state,
            &mut motor,
            MovementInput::IDLE,
            &MovementValues::default(),
            &ActionInputValues::default(),
            GRAVITY,
            0.05,
        );

        // 45 degrees in a twentieth of a second exceeds the angular cap
        assert!((state.angular_velocity.z - 12.0).abs() < 1e-5);
    }
}
