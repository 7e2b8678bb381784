use super::{Scheduler, TimerEvent, TimerHandle};

/// A single logical timer that can be restarted.
///
/// Restarting cancels the previous handle first, so two timers never race to
/// clear the same flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestartableTimer {
    handle: Option<TimerHandle>,
}

impl RestartableTimer {
    pub const fn new() -> Self {
        Self { handle: None }
    }

    pub fn restart<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        delay_ticks: u64,
        event: TimerEvent,
    ) -> TimerHandle {
        self.cancel(scheduler);
        let handle = scheduler.schedule(delay_ticks, event);
        self.handle = Some(handle);
        handle
    }

    /// Cancels the running timer, if any.
    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        self.handle
            .take()
            .is_some_and(|handle| scheduler.cancel(handle))
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Claims a fired timer. Returns `true` when `handle` is this timer's
    /// current run, which then stops.
    pub fn claim(&mut self, handle: TimerHandle) -> bool {
        if self.handle == Some(handle) {
            self.handle = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::TickScheduler;

    #[test]
    fn restarting_replaces_the_previous_run() {
        let mut scheduler = TickScheduler::new();
        let mut timer = RestartableTimer::new();

        let first = timer.restart(&mut scheduler, 2, TimerEvent::InvulnerabilityEnded);
        scheduler.advance();
        let second = timer.restart(&mut scheduler, 2, TimerEvent::InvulnerabilityEnded);

        assert!(!scheduler.is_pending(first));
        assert!(scheduler.advance().is_empty());
        let fired = scheduler.advance();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, second);
        assert!(timer.claim(second));
        assert!(!timer.is_running());
    }

    #[test]
    fn stale_handles_are_not_claimed() {
        let mut scheduler = TickScheduler::new();
        let mut timer = RestartableTimer::new();

        let first = timer.restart(&mut scheduler, 1, TimerEvent::PermeationReady);
        timer.restart(&mut scheduler, 5, TimerEvent::PermeationReady);

        assert!(!timer.claim(first));
        assert!(timer.is_running());
        assert!(timer.cancel(&mut scheduler));
        assert!(!timer.cancel(&mut scheduler));
    }
}
