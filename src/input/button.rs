//! Momentary button edge detection with a minimum press spacing

use std::time::Duration;

/// Turns a sampled "is down" level into debounced press events.
///
/// A press is accepted on the up → down edge, and only if at least
/// `min_interval` has passed since the previous accepted press. A detector
/// starts disarmed: the button has to be seen released once before the first
/// press counts, so a press that closed the previous screen does not leak
/// into the next one.
#[derive(Debug, Clone)]
pub struct PressDetector {
    was_down: bool,
    last_press: Option<Duration>,
    min_interval: Duration,
}

impl PressDetector {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            was_down: true,
            last_press: None,
            min_interval,
        }
    }

    /// Create a detector that accepts a press on the very first sample
    pub fn armed(min_interval: Duration) -> Self {
        Self {
            was_down: false,
            ..Self::new(min_interval)
        }
    }

    /// Feed the current button level; returns true for an accepted press
    pub fn update(&mut self, down: bool, now: Duration) -> bool {
        let edge = down && !self.was_down;
        self.was_down = down;
        if !edge {
            return false;
        }
        if self
            .last_press
            .is_some_and(|last| now.saturating_sub(last) <= self.min_interval)
        {
            return false;
        }
        self.last_press = Some(now);
        true
    }
}
