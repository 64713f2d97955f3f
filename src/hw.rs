//! Capability interfaces for the controller hardware
//!
//! Each collaborator gets its own narrow trait so the game can run against
//! real pins, a bench rig or a test script. `Board` bundles one of each
//! together with the encoder decoder that turns line samples into detents.

use std::time::{Duration, Instant};

use crate::error::HardwareError;
use crate::input::{LineState, QuadratureDecoder};
use crate::screen::Screen;
use crate::settings::Settings;

/// Indicator LED colour
pub type Rgb = (u8, u8, u8);

pub mod colors {
    use super::Rgb;

    pub const OFF: Rgb = (0, 0, 0);
    pub const GREEN: Rgb = (0, 255, 0);
    pub const ORANGE: Rgb = (255, 120, 0);
    pub const AMBER: Rgb = (255, 165, 0);
    pub const RED: Rgb = (255, 0, 0);
    pub const YELLOW: Rgb = (255, 255, 0);
    pub const GOLD: Rgb = (255, 215, 0);
    pub const CYAN: Rgb = (0, 255, 255);
    pub const PURPLE: Rgb = (255, 0, 255);

    /// Indicator colour for the lives left
    pub fn for_lives(lives: u8) -> Rgb {
        match lives {
            3.. => GREEN,
            2 => ORANGE,
            1 => RED,
            0 => OFF,
        }
    }
}

/// Reads both encoder lines at once as `(A, B)`
pub trait LineSampler {
    fn read(&mut self) -> Result<(bool, bool), HardwareError>;
}

/// Momentary push button. Implementations undo any active-low wiring.
pub trait ButtonSource {
    fn is_down(&mut self) -> Result<bool, HardwareError>;
}

pub trait IndicatorSink {
    fn set_color(&mut self, color: Rgb);
}

pub trait DisplaySink {
    fn show(&mut self, screen: &Screen);
}

/// Three-axis accelerometer
pub trait MotionSensor {
    fn acceleration(&mut self) -> Result<[f32; 3], HardwareError>;
}

/// Result of a freeze challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeResult {
    Success,
    Fail,
}

/// Runs a freeze challenge to completion and reports the result
pub trait FreezeChallenge {
    fn run(&mut self, clock: &dyn Clock, display: &mut dyn DisplaySink) -> FreezeResult;
}

/// Monotonic time source; `sleep` is the only way the core waits
pub trait Clock {
    /// Time since an arbitrary fixed origin
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// One of each capability plus the encoder decoder
pub struct Board {
    pub lines: Box<dyn LineSampler>,
    pub button: Box<dyn ButtonSource>,
    pub indicator: Box<dyn IndicatorSink>,
    pub display: Box<dyn DisplaySink>,
    pub freeze: Box<dyn FreezeChallenge>,
    pub clock: Box<dyn Clock>,
    pub decoder: QuadratureDecoder,
}

impl Board {
    /// Bundle the capabilities. The encoder lines are read once so decoding
    /// starts from wherever the dial is resting.
    pub fn new(
        mut lines: Box<dyn LineSampler>,
        button: Box<dyn ButtonSource>,
        indicator: Box<dyn IndicatorSink>,
        display: Box<dyn DisplaySink>,
        freeze: Box<dyn FreezeChallenge>,
        clock: Box<dyn Clock>,
        settings: &Settings,
    ) -> Result<Self, HardwareError> {
        let (a, b) = lines.read()?;
        let resting = LineState::from_lines(a, b);
        log::debug!("Dial resting at {:02b}", resting.bits());
        Ok(Self {
            lines,
            button,
            indicator,
            display,
            freeze,
            clock,
            decoder: QuadratureDecoder::with_initial_state(
                resting,
                settings.pulses_per_detent,
                settings.encoder_min_interval(),
            ),
        })
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[inline]
    pub fn sleep(&self, duration: Duration) {
        self.clock.sleep(duration);
    }

    pub fn show(&mut self, screen: &Screen) {
        self.display.show(screen);
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.indicator.set_color(color);
    }

    /// Sample the encoder lines once and take any finished detents
    pub fn poll_dial(&mut self) -> Result<i32, HardwareError> {
        let now = self.clock.now();
        let (a, b) = self.lines.read()?;
        if self.decoder.sample(a, b, now) {
            log::trace!("Detent, position {}", self.decoder.position());
        }
        Ok(self.decoder.consume_delta())
    }

    pub fn button_down(&mut self) -> Result<bool, HardwareError> {
        self.button.is_down()
    }

    /// Hand the thread to the freeze challenge until it resolves
    pub fn run_freeze(&mut self) -> FreezeResult {
        self.freeze.run(&*self.clock, &mut *self.display)
    }
}


#[cfg(test)]
mod tests {
    use super::testkit::*;
    use super::*;

    #[test]
    fn test_lives_colors() {
        assert_eq!(colors::for_lives(3), colors::GREEN);
        assert_eq!(colors::for_lives(2), colors::ORANGE);
        assert_eq!(colors::for_lives(1), colors::RED);
        assert_eq!(colors::for_lives(0), colors::OFF);
    }

    #[test]
    fn test_poll_dial_reads_detents() {
        let steps = [(false, true), (true, true), (true, false), (false, false)];
        let (mut board, rig) = rig(
            &Settings::default(),
            Box::new(ScriptedLines::new(steps)),
            FreezeResult::Success,
            |_| false,
        );
        let mut total = 0;
        for _ in 0..6 {
            total += board.poll_dial().unwrap();
            rig.clock.advance(Duration::from_millis(2));
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn test_resting_dial_reports_no_movement() {
        for rest in [(true, false), (false, true), (true, true)] {
            let (mut board, rig) = rig(
                &Settings::default(),
                Box::new(ScriptedLines::resting_at(rest, [])),
                FreezeResult::Success,
                |_| false,
            );
            let mut total = 0;
            for _ in 0..10 {
                total += board.poll_dial().unwrap();
                rig.clock.advance(Duration::from_millis(10));
            }
            assert_eq!(total, 0, "resting at {rest:?}");
            assert_eq!(board.decoder.position(), 0);
        }
    }

    #[test]
    fn test_turn_from_non_zero_rest() {
        // 10 -> 00 -> 01 -> 11 -> 10 is one full forward detent
        let steps = [(false, false), (false, true), (true, true), (true, false)];
        let (mut board, rig) = rig(
            &Settings::default(),
            Box::new(ScriptedLines::resting_at((true, false), steps)),
            FreezeResult::Success,
            |_| false,
        );
        let mut total = 0;
        for _ in 0..6 {
            total += board.poll_dial().unwrap();
            rig.clock.advance(Duration::from_millis(2));
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn test_unreadable_lines_fail_construction() {
        let built = Board::new(
            Box::new(FailingLines { good_reads: 0 }),
            Box::new(PromptButton::new(ScreenLog::default(), |_| false)),
            Box::new(RecordingIndicator::default()),
            Box::new(RecordingDisplay::default()),
            Box::new(FixedFreeze {
                result: FreezeResult::Success,
                runs: Default::default(),
            }),
            Box::new(ManualClock::default()),
            &Settings::default(),
        );
        assert!(matches!(built, Err(HardwareError::Lines(_))));
    }

    #[test]
    fn test_poll_dial_surfaces_read_errors() {
        let (mut board, _rig) = rig(
            &Settings::default(),
            Box::new(FailingLines::after_boot()),
            FreezeResult::Success,
            |_| false,
        );
        assert!(board.poll_dial().is_err());
    }
}
