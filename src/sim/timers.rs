//! Deferred power-up expiry
//!
//! Expiry is wall-clock based and independent of the frame cadence: a timer
//! armed for 6 s fires 6 s later even if frames were dropped or clamped.
//! Each timer carries the generation of the Run that armed it; the engine
//! discards timers whose generation no longer matches.

use super::state::PowerUpKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expiry {
    pub generation: u64,
    pub kind: PowerUpKind,
    delay_ms: f64,
    due_at: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpiryTimers {
    pending: Vec<Expiry>,
}

impl ExpiryTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot expiry `delay_secs` after `armed_at` (ms).
    ///
    /// Without a reference time the timer arms on the next poll.
    /// Re-arming a kind for the same generation replaces the old timer.
    pub fn schedule(
        &mut self,
        generation: u64,
        kind: PowerUpKind,
        armed_at: Option<f64>,
        delay_secs: f32,
    ) {
        self.pending
            .retain(|e| !(e.kind == kind && e.generation == generation));
        let delay_ms = delay_secs as f64 * 1000.0;
        self.pending.push(Expiry {
            generation,
            kind,
            delay_ms,
            due_at: armed_at.map(|t| t + delay_ms),
        });
    }

    /// Remove and return every timer due at `now` (ms)
    pub fn take_due(&mut self, now: f64) -> Vec<Expiry> {
        let mut due = Vec::new();
        self.pending.retain_mut(|e| {
            let at = *e.due_at.get_or_insert(now + e.delay_ms);
            if at <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_when_due() {
        let mut timers = ExpiryTimers::new();
        timers.schedule(1, PowerUpKind::Shield, Some(1000.0), 6.0);
        assert!(timers.take_due(6999.0).is_empty());
        let due = timers.take_due(7000.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].kind, PowerUpKind::Shield);
        assert_eq!(due[0].generation, 1);
        assert!(timers.take_due(100_000.0).is_empty());
    }

    #[test]
    fn test_unarmed_timer_arms_on_first_poll() {
        let mut timers = ExpiryTimers::new();
        timers.schedule(3, PowerUpKind::Slow, None, 4.2);
        assert!(timers.take_due(50_000.0).is_empty());
        assert!(timers.take_due(54_199.0).is_empty());
        assert_eq!(timers.take_due(54_200.0).len(), 1);
    }

    #[test]
    fn test_rearm_replaces() {
        let mut timers = ExpiryTimers::new();
        timers.schedule(1, PowerUpKind::Slow, Some(0.0), 1.0);
        timers.schedule(1, PowerUpKind::Slow, Some(500.0), 1.0);
        assert_eq!(timers.len(), 1);
        assert!(timers.take_due(1000.0).is_empty());
        assert_eq!(timers.take_due(1500.0).len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut timers = ExpiryTimers::new();
        timers.schedule(1, PowerUpKind::Slow, Some(0.0), 1.0);
        timers.schedule(1, PowerUpKind::Shield, Some(0.0), 1.0);
        timers.clear();
        assert!(timers.is_empty());
        assert!(timers.take_due(1e9).is_empty());
    }
}
