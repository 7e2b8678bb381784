//! The collide-and-slide motor seam.
//!
//! The sweep and ground probing live outside this crate. The core only asks
//! the motor about contact state, hands it a velocity, and receives the
//! contacts the sweep produced as [`MotorEvent`] messages.

use core::fmt;

use glam::Vec3;

bitflags::bitflags! {
    /// Gameplay tags attached to a collider by the host.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ColliderTags: u8 {
        /// Blocks movement.
        const SOLID = 0b0001;
        /// Can be passed through by the permeation ability.
        const PERMEABLE = 0b0010;
        /// Receives attack hits.
        const HURTBOX = 0b0100;
    }
}

/// Host-assigned collider identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColliderId(pub u32);

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collider#{}", self.0)
    }
}

/// A collider as seen by gameplay code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collider {
    pub id: ColliderId,
    pub tags: ColliderTags,
}

impl Collider {
    pub const fn new(id: ColliderId, tags: ColliderTags) -> Self {
        Self { id, tags }
    }

    #[inline]
    pub fn is_permeable(&self) -> bool {
        self.tags.contains(ColliderTags::PERMEABLE)
    }
}

/// The motor's verdict on whether a contact can be stood on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StabilityReport {
    pub is_stable: bool,
    /// Angle between the contact normal and up, degrees.
    pub slope_angle: f32,
}

/// One contact produced by a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitReport {
    pub collider: Collider,
    pub normal: Vec3,
    pub point: Vec3,
    pub stability: StabilityReport,
}

/// Contacts reported by the motor, dispatched by the tick driver in order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotorEvent {
    /// The sweep hit something while moving.
    MovementHit(HitReport),
    /// The ground probe found a surface.
    GroundHit(HitReport),
}

impl MotorEvent {
    pub fn report(&self) -> &HitReport {
        match self {
            MotorEvent::MovementHit(report) | MotorEvent::GroundHit(report) => report,
        }
    }
}

/// Decides which colliders the sweep may collide with.
pub trait CollisionFilter {
    fn is_collider_valid_for_collisions(&self, collider: &Collider) -> bool;
}

/// Accepts every collider.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl CollisionFilter for AcceptAll {
    fn is_collider_valid_for_collisions(&self, _collider: &Collider) -> bool {
        true
    }
}

/// External collide-and-slide solver driving one character capsule.
pub trait Motor {
    /// Whether the last sweep ended on stable ground.
    fn is_grounded_this_update(&self) -> bool;

    /// Normal of the ground under the character, valid when grounded.
    fn effective_ground_normal(&self) -> Vec3;

    /// Normal of the plane motion is constrained to.
    fn planar_constraint_axis(&self) -> Vec3;

    /// Steepest slope the motor treats as stable ground, degrees.
    fn max_stable_slope_angle(&self) -> f32;

    fn base_velocity(&self) -> Vec3;

    fn set_base_velocity(&mut self, velocity: Vec3);

    /// Leaves the ground on the next sweep even if a surface is found.
    fn force_unground(&mut self);

    /// Character position after the last sweep.
    fn position(&self) -> Vec3;

    /// Moves the capsule by the base velocity for `dt`, consulting `filter`
    /// for each candidate collider, and returns the contacts encountered.
    fn sweep(&mut self, dt: f32, filter: &dyn CollisionFilter) -> Vec<MotorEvent>;
}
