//! Planar movement: motor seam, per-tick state, locomotion and integration.
//!
//! Motion always lives on a single plane whose normal the motor reports each
//! tick. The integrator never fails; degenerate vectors surface as NaN in the
//! resulting state.

pub mod integrator;
pub mod locomotion;
pub mod motor;
pub mod plane;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use integrator::{Branch, IntegrationReport, PlanarPhysicsIntegrator};
pub use locomotion::{Locomotion, LocomotionReport, MovementInput};
pub use motor::{
    AcceptAll, Collider, ColliderId, ColliderTags, CollisionFilter, HitReport, Motor, MotorEvent,
    StabilityReport,
};
pub use state::{MovementState, NegationFlags};
