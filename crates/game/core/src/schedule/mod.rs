//! Injected tick clock with one-shot, cancellable timers.
//!
//! Each character is driven with its own scheduler; [`TickScheduler::advance`]
//! is called once at the start of the character's tick.

mod timer;

pub use timer::RestartableTimer;

use core::fmt;

use tracing::trace;

/// Fixed simulation step counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl core::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one scheduled timer. Never reused by a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What a timer means when it fires.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum TimerEvent {
    /// Invulnerability frames ran out.
    InvulnerabilityEnded,
    /// Permeation reached its maximum duration.
    PermeationExpired,
    /// Permeation cooldown elapsed.
    PermeationReady,
}

/// A timer that came due during [`TickScheduler::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub event: TimerEvent,
}

/// Clock service handed to anything that needs delayed work.
pub trait Scheduler {
    fn now(&self) -> Tick;

    /// Schedules `event` to fire after `delay_ticks` ticks. A zero delay fires
    /// on the next advance.
    fn schedule(&mut self, delay_ticks: u64, event: TimerEvent) -> TimerHandle;

    /// Cancels a pending timer. Returns `false` when it already fired or was
    /// cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    fn is_pending(&self, handle: TimerHandle) -> bool;
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    handle: TimerHandle,
    due: Tick,
    event: TimerEvent,
}

/// Deterministic clock advanced explicitly by the tick driver.
#[derive(Clone, Debug, Default)]
pub struct TickScheduler {
    now: Tick,
    next_handle: u64,
    pending: Vec<Pending>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward one tick and returns every timer now due, in
    /// the order they were scheduled.
    pub fn advance(&mut self) -> Vec<FiredTimer> {
        self.now = self.now + 1;
        let now = self.now;
        let mut fired = Vec::new();
        self.pending.retain(|pending| {
            if pending.due <= now {
                fired.push(FiredTimer {
                    handle: pending.handle,
                    event: pending.event,
                });
                false
            } else {
                true
            }
        });
        for timer in &fired {
            trace!(target: "kinetic::schedule", tick = %now, event = %timer.event, "timer fired");
        }
        fired
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Scheduler for TickScheduler {
    fn now(&self) -> Tick {
        self.now
    }

    fn schedule(&mut self, delay_ticks: u64, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let due = self.now + delay_ticks.max(1);
        self.pending.push(Pending { handle, due, event });
        trace!(target: "kinetic::schedule", %due, %event, "timer scheduled");
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.handle != handle);
        before != self.pending.len()
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|pending| pending.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_after_their_delay() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(2, TimerEvent::PermeationReady);

        assert!(scheduler.advance().is_empty());
        let fired = scheduler.advance();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].event, TimerEvent::PermeationReady);
        assert_eq!(scheduler.now(), Tick(2));
    }

    #[test]
    fn due_timers_come_out_in_scheduling_order() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(3, TimerEvent::PermeationExpired);
        scheduler.schedule(1, TimerEvent::InvulnerabilityEnded);
        scheduler.schedule(3, TimerEvent::PermeationReady);

        let first: Vec<_> = scheduler.advance().into_iter().map(|t| t.event).collect();
        assert_eq!(first, vec![TimerEvent::InvulnerabilityEnded]);
        scheduler.advance();
        let third: Vec<_> = scheduler.advance().into_iter().map(|t| t.event).collect();
        assert_eq!(
            third,
            vec![TimerEvent::PermeationExpired, TimerEvent::PermeationReady]
        );
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(0, TimerEvent::InvulnerabilityEnded);
        assert_eq!(scheduler.advance().len(), 1);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut scheduler = TickScheduler::new();
        let handle = scheduler.schedule(1, TimerEvent::InvulnerabilityEnded);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }
}
