//! Attack session state machine driven by animation signals.
//!
//! ```text
//! Finished ──request──▶ Startup ──committal──▶ Commital ──bufferable──▶ Bufferable
//!     ▲                    │                                                │
//!     └────────────── finished signal / flinch / cancel ◀───────────────────┘
//! ```
//!
//! The machine owns the receipt of the running attack's override bundle, so
//! every exit path pops exactly what the entry pushed.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use super::{AttackDefinition, AttackLibrary, HitVolumes};
use crate::config::SimConfig;
use crate::error::{ErrorSeverity, SimError};
use crate::overrides::{BundleReceipt, OverrideRegistry};

/// Phase of the current attack.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum AttackState {
    /// No attack running.
    #[default]
    Finished,
    /// Wind-up; a different request cancels into it.
    Startup,
    /// Locked in; requests are ignored.
    Commital,
    /// Recovery; a request is buffered for when the attack ends.
    Bufferable,
}

/// Message emitted by the state machine for animation and combat glue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttackEvent {
    Started { attack: String },
    Buffered { attack: String },
    Canceled { attack: String },
    Committed { attack: String },
    Bufferable { attack: String },
    Finished { attack: String },
    Flinched { attack: String },
    PlayAnimation { animation: String },
}

/// Events produced by one state machine call, in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackEvents(ArrayVec<AttackEvent, { SimConfig::MAX_ATTACK_EVENTS }>);

impl AttackEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, event: AttackEvent) {
        if let Err(overflow) = self.0.try_push(event) {
            warn!(target: "kinetic::combat", event = ?overflow.element(), "attack event dropped");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[AttackEvent] {
        &self.0
    }

    pub fn iter(&self) -> core::slice::Iter<'_, AttackEvent> {
        self.0.iter()
    }
}

impl IntoIterator for AttackEvents {
    type Item = AttackEvent;
    type IntoIter = arrayvec::IntoIter<AttackEvent, { SimConfig::MAX_ATTACK_EVENTS }>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttackEvents {
    type Item = &'a AttackEvent;
    type IntoIter = core::slice::Iter<'a, AttackEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("no attack named `{0}` in the library")]
    UnknownAttack(String),
}

impl SimError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAttack(_) => "ATTACK_UNKNOWN",
        }
    }
}

/// The running attack, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackSession {
    current: Option<String>,
    state: AttackState,
    buffered: Option<String>,
    receipt: Option<BundleReceipt>,
}

impl AttackSession {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn state(&self) -> AttackState {
        self.state
    }

    pub fn buffered(&self) -> Option<&str> {
        self.buffered.as_deref()
    }

    /// Whether the running attack still holds override layers.
    pub fn holds_overrides(&self) -> bool {
        self.receipt.is_some()
    }
}

/// Attack state machine plus the hit volumes it arms.
#[derive(Clone, Debug, Default)]
pub struct AttackStateMachine {
    session: AttackSession,
    volumes: HitVolumes,
}

impl AttackStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &AttackSession {
        &self.session
    }

    pub fn state(&self) -> AttackState {
        self.session.state
    }

    pub fn hit_volumes(&self) -> &HitVolumes {
        &self.volumes
    }

    /// Asks for `name` to be performed now or after the running attack.
    ///
    /// # Errors
    ///
    /// [`AttackError::UnknownAttack`] when `library` has no such attack; the
    /// session is left untouched.
    pub fn request(
        &mut self,
        name: &str,
        library: &AttackLibrary,
        registry: &mut OverrideRegistry,
    ) -> Result<AttackEvents, AttackError> {
        let definition = library
            .get(name)
            .ok_or_else(|| AttackError::UnknownAttack(name.to_owned()))?;

        let mut events = AttackEvents::new();
        match self.session.state {
            AttackState::Finished => self.start(definition, registry, &mut events),
            AttackState::Startup if self.session.current.as_deref() == Some(name) => {
                debug!(target: "kinetic::combat", attack = name, "repeat request during startup ignored");
            }
            AttackState::Startup => {
                self.buffer(name, &mut events);
                if let Some(current) = self.session.current.clone() {
                    events.emit(AttackEvent::Canceled { attack: current });
                }
                self.finish(library, registry, &mut events);
            }
            AttackState::Commital => {
                debug!(target: "kinetic::combat", attack = name, "request during commital ignored");
            }
            AttackState::Bufferable => self.buffer(name, &mut events),
        }
        Ok(events)
    }

    /// Animation reached the point of no return.
    pub fn on_committal_signal(&mut self, library: &AttackLibrary) -> AttackEvents {
        let mut events = AttackEvents::new();
        if self.session.state != AttackState::Startup {
            return events;
        }
        self.session.state = AttackState::Commital;
        if let Some(current) = self.session.current.clone() {
            if let Some(definition) = library.get(&current) {
                self.volumes.arm(&definition.hit_volumes);
            }
            debug!(target: "kinetic::combat", attack = %current, "committed");
            events.emit(AttackEvent::Committed { attack: current });
        }
        events
    }

    /// Animation entered its recovery window.
    pub fn on_bufferable_signal(&mut self) -> AttackEvents {
        let mut events = AttackEvents::new();
        if self.session.state != AttackState::Commital {
            return events;
        }
        self.session.state = AttackState::Bufferable;
        if let Some(current) = self.session.current.clone() {
            events.emit(AttackEvent::Bufferable { attack: current });
        }
        events
    }

    /// Animation ended.
    pub fn on_finished_signal(
        &mut self,
        library: &AttackLibrary,
        registry: &mut OverrideRegistry,
    ) -> AttackEvents {
        let mut events = AttackEvents::new();
        if self.session.state != AttackState::Finished {
            self.finish(library, registry, &mut events);
        }
        events
    }

    /// Interrupts whatever is running and drops the buffered request.
    ///
    /// Hit volumes are disabled even when nothing was running.
    pub fn flinch(&mut self, registry: &mut OverrideRegistry) -> AttackEvents {
        let mut events = AttackEvents::new();
        self.session.buffered = None;
        self.volumes.disable_all();
        if self.session.state == AttackState::Finished {
            return events;
        }

        let attack = self.release(registry);
        debug!(target: "kinetic::combat", attack = %attack, "flinched");
        events.emit(AttackEvent::Flinched {
            attack: attack.clone(),
        });
        events.emit(AttackEvent::Finished { attack });
        events
    }

    /// Pops any held overrides without emitting events. Used on teardown.
    pub fn shutdown(&mut self, registry: &mut OverrideRegistry) {
        self.session.buffered = None;
        self.volumes.disable_all();
        if self.session.state != AttackState::Finished || self.session.receipt.is_some() {
            self.release(registry);
        }
    }

    fn buffer(&mut self, name: &str, events: &mut AttackEvents) {
        self.session.buffered = Some(name.to_owned());
        events.emit(AttackEvent::Buffered {
            attack: name.to_owned(),
        });
    }

    fn start(
        &mut self,
        definition: &AttackDefinition,
        registry: &mut OverrideRegistry,
        events: &mut AttackEvents,
    ) {
        self.session.buffered = None;
        self.session.current = Some(definition.name.clone());
        self.session.state = AttackState::Startup;
        self.session.receipt = Some(registry.apply_bundle(&definition.overrides));
        debug!(target: "kinetic::combat", attack = %definition.name, "attack started");
        events.emit(AttackEvent::Started {
            attack: definition.name.clone(),
        });
        events.emit(AttackEvent::PlayAnimation {
            animation: definition.animation.clone(),
        });
    }

    /// Leaves the running attack: pops its overrides, disarms volumes and
    /// returns its name.
    fn release(&mut self, registry: &mut OverrideRegistry) -> String {
        if let Some(receipt) = self.session.receipt.take() {
            registry.remove_bundle(receipt);
        }
        self.volumes.disable_all();
        self.session.state = AttackState::Finished;
        self.session.current.take().unwrap_or_default()
    }

    fn finish(
        &mut self,
        library: &AttackLibrary,
        registry: &mut OverrideRegistry,
        events: &mut AttackEvents,
    ) {
        let attack = self.release(registry);
        debug!(target: "kinetic::combat", attack = %attack, "attack finished");
        events.emit(AttackEvent::Finished { attack });

        let Some(next) = self.session.buffered.take() else {
            return;
        };
        match library.get(&next) {
            Some(definition) => self.start(definition, registry, events),
            None => warn!(target: "kinetic::combat", attack = %next, "buffered attack vanished from library"),
        }
    }
}
