//! Freeze challenge: hold the controller still
//!
//! After a one second warning a baseline is averaged from a few accelerometer
//! samples, then the sensor is polled at a fixed cadence for the observation
//! window. Moving any axis more than the threshold between two consecutive
//! samples fails the challenge. Spikes shorter than the cadence can slip
//! between samples; that is accepted.

use std::time::Duration;

use crate::hw::{Clock, DisplaySink, FreezeChallenge, FreezeResult, MotionSensor};
use crate::screen::Screen;

pub const WARNING: Duration = Duration::from_secs(1);
pub const BASELINE_SAMPLES: usize = 5;
pub const BASELINE_SPACING: Duration = Duration::from_millis(20);
pub const OBSERVATION: Duration = Duration::from_secs(3);
pub const SAMPLE_CADENCE: Duration = Duration::from_millis(100);
/// Per-axis change (m/s²) that counts as moving
pub const MOTION_THRESHOLD: f32 = 1.0;

/// Accelerometer-backed freeze challenge
pub struct StillnessChallenge<M> {
    sensor: M,
}

impl<M: MotionSensor> StillnessChallenge<M> {
    pub fn new(sensor: M) -> Self {
        Self { sensor }
    }

    fn moved(prev: [f32; 3], now: [f32; 3]) -> bool {
        prev.iter().zip(now.iter()).any(|(p, n)| (n - p).abs() > MOTION_THRESHOLD)
    }

    fn observe(&mut self, clock: &dyn Clock) -> Result<FreezeResult, crate::error::HardwareError> {
        let mut baseline = [0.0f32; 3];
        for _ in 0..BASELINE_SAMPLES {
            let sample = self.sensor.acceleration()?;
            for (acc, v) in baseline.iter_mut().zip(sample) {
                *acc += v;
            }
            clock.sleep(BASELINE_SPACING);
        }
        let mut prev = baseline.map(|v| v / BASELINE_SAMPLES as f32);

        let start = clock.now();
        while clock.now().saturating_sub(start) < OBSERVATION {
            let sample = self.sensor.acceleration()?;
            if Self::moved(prev, sample) {
                log::info!("Freeze challenge failed: moved to {:?} from {:?}", sample, prev);
                return Ok(FreezeResult::Fail);
            }
            prev = sample;
            clock.sleep(SAMPLE_CADENCE);
        }
        Ok(FreezeResult::Success)
    }
}

impl<M: MotionSensor> FreezeChallenge for StillnessChallenge<M> {
    fn run(&mut self, clock: &dyn Clock, display: &mut dyn DisplaySink) -> FreezeResult {
        display.show(&Screen::FreezeWarning);
        clock.sleep(WARNING);
        display.show(&Screen::FreezeHold);

        match self.observe(clock) {
            Ok(result) => result,
            Err(e) => {
                // A dead sensor shouldn't cost the player a life
                log::warn!("Freeze challenge skipped: {}", e);
                FreezeResult::Success
            }
        }
    }
}
