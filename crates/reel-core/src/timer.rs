//! Single-outstanding deadlines driven by host time

use std::time::{Duration, Instant};

/// A timer slot that holds at most one pending deadline.
///
/// Scheduling replaces whatever was pending, so two competing deadlines can
/// never exist for the same slot. The host polls it with the current time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Instant>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the slot `delay` after `now`, canceling any previous deadline
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, if one is pending
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true once when the deadline has passed, disarming the slot
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.schedule(t0, Duration::from_millis(100));
        assert!(!slot.fire_if_due(t0 + Duration::from_millis(99)));
        assert!(slot.fire_if_due(t0 + Duration::from_millis(100)));
        assert!(!slot.fire_if_due(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.schedule(t0, Duration::from_millis(100));
        slot.schedule(t0 + Duration::from_millis(50), Duration::from_millis(100));
        assert!(!slot.fire_if_due(t0 + Duration::from_millis(120)));
        assert!(slot.fire_if_due(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.schedule(t0, Duration::ZERO);
        slot.cancel();
        assert!(!slot.is_pending());
        assert!(!slot.fire_if_due(t0));
        assert_eq!(slot.remaining(t0), None);
    }
}
