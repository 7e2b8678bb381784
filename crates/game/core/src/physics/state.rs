use glam::{Quat, Vec3};

use super::Motor;

bitflags::bitflags! {
    /// One-shot switches that suppress parts of the next integration.
    ///
    /// Any component may raise them before the integrator runs; the integrator
    /// clears them at the end of every tick.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NegationFlags: u8 {
        const FRICTION = 0b001;
        const DRAG = 0b010;
        const GRAVITY = 0b100;
    }
}

/// Per-tick kinematic state of one character.
///
/// Only the current and previous tick are ever kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementState {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub grounded: bool,
    pub was_grounded: bool,
    pub ground_normal: Vec3,
    /// Normal of the movement plane.
    pub plane_normal: Vec3,
}

impl MovementState {
    pub fn new(position: Vec3, plane_normal: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            grounded: false,
            was_grounded: false,
            ground_normal: Vec3::Y,
            plane_normal,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Copies the motor's contact answers without shifting the previous-tick
    /// flag. Used before integration.
    pub fn sample_contact<M: Motor + ?Sized>(&mut self, motor: &M) {
        self.grounded = motor.is_grounded_this_update();
        self.ground_normal = motor.effective_ground_normal();
        self.plane_normal = motor.planar_constraint_axis();
    }

    /// Records the result of a sweep. `grounded_before` is the grounding
    /// sampled at the start of the tick, before locomotion could clear it.
    pub fn record_sweep<M: Motor + ?Sized>(&mut self, motor: &M, grounded_before: bool) {
        self.was_grounded = grounded_before;
        self.position = motor.position();
        self.velocity = motor.base_velocity();
        self.sample_contact(motor);
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn just_landed(&self) -> bool {
        self.grounded && !self.was_grounded
    }

    pub fn just_left_ground(&self) -> bool {
        !self.grounded && self.was_grounded
    }

    /// Character up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}
