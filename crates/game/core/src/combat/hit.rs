//! Attacker hit volumes and defender invulnerability.

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::config::SimConfig;
use crate::schedule::{RestartableTimer, Scheduler, TimerEvent, TimerHandle};

/// A named hit-detection volume owned by an attacker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitVolume {
    pub name: String,
    pub enabled: bool,
}

/// Every hit volume an attacker has armed so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitVolumes {
    volumes: ArrayVec<HitVolume, { SimConfig::MAX_HIT_VOLUMES }>,
}

impl HitVolumes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the named volumes, adopting any not seen before.
    pub fn arm<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            if let Some(volume) = self.volumes.iter_mut().find(|v| v.name == name) {
                volume.enabled = true;
                continue;
            }
            let volume = HitVolume {
                name: name.to_owned(),
                enabled: true,
            };
            if self.volumes.try_push(volume).is_err() {
                warn!(
                    target: "kinetic::combat",
                    volume = name,
                    capacity = SimConfig::MAX_HIT_VOLUMES,
                    "hit volume table full"
                );
            }
        }
    }

    pub fn disable_all(&mut self) {
        for volume in &mut self.volumes {
            volume.enabled = false;
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.volumes.iter().any(|v| v.enabled && v.name == name)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.volumes
            .iter()
            .filter(|v| v.enabled)
            .map(|v| v.name.as_str())
    }

    pub fn any_enabled(&self) -> bool {
        self.volumes.iter().any(|v| v.enabled)
    }
}

/// Defender-side invulnerability frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vulnerability {
    timer: RestartableTimer,
}

impl Vulnerability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.timer.is_running()
    }

    /// Makes the character invulnerable for `ticks`, replacing any shorter or
    /// longer window already running.
    pub fn grant<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, ticks: u64) {
        if ticks == 0 {
            return;
        }
        self.timer
            .restart(scheduler, ticks, TimerEvent::InvulnerabilityEnded);
        debug!(target: "kinetic::combat", ticks, "invulnerability granted");
    }

    /// Ends invulnerability immediately.
    pub fn revoke<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.timer.cancel(scheduler);
    }

    /// Handles a fired timer. Returns `true` when it ended the i-frames.
    pub fn on_timer(&mut self, handle: TimerHandle, event: TimerEvent) -> bool {
        event == TimerEvent::InvulnerabilityEnded && self.timer.claim(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TickScheduler;

    #[test]
    fn arming_reuses_known_volumes() {
        let mut volumes = HitVolumes::new();
        volumes.arm(&["blade", "hilt"]);
        volumes.disable_all();
        volumes.arm(&["blade"]);

        assert!(volumes.is_enabled("blade"));
        assert!(!volumes.is_enabled("hilt"));
        assert_eq!(volumes.enabled().count(), 1);
    }

    #[test]
    fn overflowing_volumes_are_dropped() {
        let mut volumes = HitVolumes::new();
        let names: Vec<String> = (0..SimConfig::MAX_HIT_VOLUMES + 2)
            .map(|i| format!("v{i}"))
            .collect();
        volumes.arm(&names);
        assert_eq!(volumes.enabled().count(), SimConfig::MAX_HIT_VOLUMES);
    }

    #[test]
    fn regranting_iframes_extends_the_window() {
        let mut scheduler = TickScheduler::new();
        let mut vulnerability = Vulnerability::new();

        vulnerability.grant(&mut scheduler, 2);
        scheduler.advance();
        vulnerability.grant(&mut scheduler, 2);

        for timer in scheduler.advance() {
            vulnerability.on_timer(timer.handle, timer.event);
        }
        assert!(vulnerability.is_invulnerable());

        for timer in scheduler.advance() {
            assert!(vulnerability.on_timer(timer.handle, timer.event));
        }
        assert!(!vulnerability.is_invulnerable());
    }
}
