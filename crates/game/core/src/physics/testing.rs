//! Scriptable motor for unit tests.

use glam::Vec3;

use super::{CollisionFilter, Motor, MotorEvent};

#[derive(Clone, Debug)]
pub struct StubMotor {
    pub grounded: bool,
    pub ground_normal: Vec3,
    pub plane_axis: Vec3,
    pub max_slope: f32,
    pub velocity: Vec3,
    pub position: Vec3,
    pub unground_requests: u32,
    /// Contacts handed out by the next sweep, subject to the filter.
    pub pending: Vec<MotorEvent>,
    pub sweeps: u32,
}

impl StubMotor {
    pub fn grounded() -> Self {
        Self {
            grounded: true,
            ..Self::airborne()
        }
    }

    pub fn airborne() -> Self {
        Self {
            grounded: false,
            ground_normal: Vec3::Y,
            plane_axis: Vec3::Z,
            max_slope: 60.0,
            velocity: Vec3::ZERO,
            position: Vec3::ZERO,
            unground_requests: 0,
            pending: Vec::new(),
            sweeps: 0,
        }
    }
}

impl Motor for StubMotor {
    fn is_grounded_this_update(&self) -> bool {
        self.grounded
    }

    fn effective_ground_normal(&self) -> Vec3 {
        self.ground_normal
    }

    fn planar_constraint_axis(&self) -> Vec3 {
        self.plane_axis
    }

    fn max_stable_slope_angle(&self) -> f32 {
        self.max_slope
    }

    fn base_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_base_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn force_unground(&mut self) {
        self.unground_requests += 1;
        self.grounded = false;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn sweep(&mut self, dt: f32, filter: &dyn CollisionFilter) -> Vec<MotorEvent> {
        self.sweeps += 1;
        self.position += self.velocity * dt;
        self.pending
            .drain(..)
            .filter(|event| filter.is_collider_valid_for_collisions(&event.report().collider))
            .collect()
    }
}
