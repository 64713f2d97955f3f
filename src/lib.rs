//! Vault Dial - a rotary-dial reaction game that guards a safe
//!
//! Core modules:
//! - `input`: Quadrature decoding and button edge detection
//! - `sim`: Game rules (cursor, success zone, per-tick logic, session driver)
//! - `hw`: Capability traits for pins, display, LED, motion sensor and clock
//! - `link`: LOCK/UNLOCK/STATUS protocol to the safe actuator
//! - `highscores`: Per-mode top-3 ledger on disk
//! - `device`: Menu loop and fault boundary

pub mod device;
pub mod error;
pub mod highscores;
pub mod hw;
pub mod input;
pub mod link;
pub mod menu;
pub mod screen;
pub mod settings;
pub mod sim;

pub use device::Controller;
pub use error::{GameError, HardwareError, LedgerError, LinkError};
pub use highscores::{Leaderboard, RankEntry, RankLedger};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Cursor velocity gained per detent (degrees per tick)
    pub const CURSOR_ACCEL: f32 = 2.0;
    /// Velocity kept each tick
    pub const CURSOR_FRICTION: f32 = 0.985;
    pub const CURSOR_MAX_SPEED: f32 = 22.0;

    /// Countdown step
    pub const ONE_SECOND: Duration = Duration::from_secs(1);

    /// Endless mode
    pub const ENDLESS_START_WIDTH: u16 = 100;
    pub const ENDLESS_MIN_WIDTH: u16 = 25;
    pub const ENDLESS_SHRINK_STEP: u16 = 2;
    /// Zone shrinks after every this many hits
    pub const ENDLESS_SHRINK_EVERY: u32 = 3;
    pub const ENDLESS_START_SECS: i32 = 30;
    pub const ENDLESS_START_LIVES: u8 = 3;
    pub const ENDLESS_HIT_BONUS_SECS: i32 = 1;

    /// Miss penalty
    pub const STUN_DURATION: Duration = Duration::from_millis(2_500);
    pub const STUN_FRAME: Duration = Duration::from_millis(50);
    pub const STUN_FLASH_INTERVAL: Duration = Duration::from_millis(250);
    /// Star ring rotation per stun frame (degrees)
    pub const STUN_SPIN_STEP: u16 = 15;

    /// Screen hold times
    pub const SPLASH_DURATION: Duration = Duration::from_secs(4);
    pub const CONNECTING_PAUSE: Duration = Duration::from_millis(500);
    pub const ENDLESS_INTRO: Duration = Duration::from_millis(2_500);
    pub const LIFE_LOST_PAUSE: Duration = Duration::from_millis(1_300);
    pub const LEVEL_TRANSITION_PAUSE: Duration = Duration::from_millis(1_500);
    pub const HIGH_SCORE_PAUSE: Duration = Duration::from_secs(2);
    pub const MISSION_COMPLETE_PAUSE: Duration = Duration::from_secs(3);
    pub const ENDLESS_SUMMARY_PAUSE: Duration = Duration::from_secs(3);
    pub const FAULT_PAUSE: Duration = Duration::from_secs(3);
}

/// Normalized angle to [0, 360) degrees
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}
