//! Attack sessions, hit volumes and invulnerability.
//!
//! The attack state machine decides when an attack's override bundle is
//! live; it never touches physics directly. Hit detection itself belongs to
//! the host, which reads [`HitVolumes`] to know what is armed.

pub mod attack;
pub mod hit;
pub mod library;

pub use attack::{AttackError, AttackEvent, AttackEvents, AttackSession, AttackState, AttackStateMachine};
pub use hit::{HitVolume, HitVolumes, Vulnerability};
pub use library::{AttackDefinition, AttackLibrary};
