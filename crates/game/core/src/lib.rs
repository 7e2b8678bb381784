//! Planar movement and combat simulation for a single character.
//!
//! `kinetic-core` owns the per-tick rules: layered value overrides, the
//! plane-constrained physics integrator, the attack state machine and the
//! abilities that reshape movement through overrides. Collision sweeping is
//! delegated to the host through [`physics::Motor`]; everything is driven one
//! fixed step at a time by [`character::Character::tick`].
pub mod abilities;
pub mod character;
pub mod combat;
pub mod config;
pub mod error;
pub mod overrides;
pub mod physics;
pub mod schedule;
pub mod values;

pub use abilities::{Ability, AbilityContext, PermeationPhase, SurfacePermeation};
pub use character::{Character, CharacterCommand, CharacterProfile, TickReport};
pub use combat::{
    AttackDefinition, AttackError, AttackEvent, AttackEvents, AttackLibrary, AttackSession,
    AttackState, AttackStateMachine, HitVolumes, Vulnerability,
};
pub use config::SimConfig;
pub use error::{ConfigError, ErrorSeverity, SimError};
pub use overrides::{
    BundleReceipt, OverridableAttribute, OverrideBundle, OverrideEntry, OverrideKind,
    OverrideRegistry, OverrideToken, RegistryError,
};
pub use physics::{
    Collider, ColliderId, ColliderTags, CollisionFilter, HitReport, Motor, MotorEvent,
    MovementInput, MovementState, NegationFlags, PlanarPhysicsIntegrator, StabilityReport,
};
pub use schedule::{RestartableTimer, Scheduler, Tick, TickScheduler, TimerEvent, TimerHandle};
pub use values::{
    ActionInputValues, AnyValues, FieldError, FieldValue, Fill, MovementValues, PermeationValues,
    PhysicsValues, ValueSet, ValueSetKind,
};
