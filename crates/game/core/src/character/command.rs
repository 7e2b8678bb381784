use crate::combat::AttackEvent;
use crate::overrides::OverrideBundle;
use crate::physics::{ColliderId, IntegrationReport};
use crate::schedule::Tick;

/// Message from glue code, queued and handled at the start of the next tick.
#[derive(Clone, Debug, PartialEq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CharacterCommand {
    RequestAttack(String),
    CommittalSignal,
    BufferableSignal,
    FinishedSignal,
    Flinch,
    /// Applies a scripted bundle under `key`, replacing any bundle already
    /// held under that key.
    ApplyBundle {
        key: String,
        bundle: OverrideBundle,
    },
    RemoveBundle {
        key: String,
    },
    /// The character no longer overlaps the collider.
    OverlapEnded(ColliderId),
}

/// What happened during one character tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: Tick,
    pub attack_events: Vec<AttackEvent>,
    /// Contacts the sweep produced.
    pub motor_events: usize,
    pub grounded: bool,
    pub jumped: bool,
    pub integration: IntegrationReport,
    /// Commands that were refused (locked input, unknown attack, i-frames).
    pub rejected_commands: usize,
}
