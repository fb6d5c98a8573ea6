//! Frame clock
//!
//! Converts the scheduler's monotonic timestamps (milliseconds, as handed out
//! by `requestAnimationFrame`) into a clamped simulation delta.

use crate::consts::MAX_FRAME_DT;

#[derive(Debug, Clone)]
pub struct Clock {
    last: Option<f64>,
    max_dt: f32,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl Clock {
    /// Create a clock whose deltas never exceed `max_dt` seconds
    pub fn new(max_dt: f32) -> Self {
        Self {
            last: None,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Sample the clock at `now` (ms) and return the elapsed seconds.
    ///
    /// The first sample yields 0. Gaps longer than `max_dt` (suspended tab,
    /// slow frame) are truncated; a timestamp that goes backwards yields 0.
    pub fn tick(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((now - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last = Some(now);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Most recent sample (ms)
    pub fn last(&self) -> Option<f64> {
        self.last
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}
