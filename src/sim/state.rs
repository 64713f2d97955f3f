//! Session state and core game types
//!
//! Everything a run needs between ticks lives in `SessionState`. The session
//! exclusively owns the cursor and the success zone for the run's lifetime.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cursor::CursorState;
use super::zone::SuccessZoneEngine;
use crate::consts::*;
use crate::input::PressDetector;
use crate::settings::{FreezeOdds, Settings};

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Ten fixed levels, clearing the last one opens the safe
    Campaign,
    /// One unbounded level on a growing time bank
    Endless,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Campaign, GameMode::Endless];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Campaign => "CAMPAIGN",
            GameMode::Endless => "ENDLESS",
        }
    }
}

/// Difficulty only sets the starting lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn starting_lives(&self) -> u8 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 2,
            Difficulty::Hard => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

/// How a run (or a nested sub-loop) ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Keep going at the current level
    Continue,
    /// Player asked to play again
    Restart,
    /// Player asked to leave
    Exit,
}

impl RunOutcome {
    /// True for outcomes that must unwind every enclosing loop
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunOutcome::Continue)
    }
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Per-tick play inside a level
    LevelRunning,
    /// Level cleared, next level pending
    LevelTransition,
    /// A life was lost, the level restarts
    LifeLost,
    /// Final campaign level cleared
    Victory,
    /// Out of lives (or out of time in endless)
    GameOver,
    /// Collecting initials for the ledger
    HighScoreEntry,
}

/// One campaign level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub inputs_required: u32,
    pub time_limit_secs: i32,
    pub zone_width: u16,
}

const fn level(inputs_required: u32, time_limit_secs: i32, zone_width: u16) -> LevelSpec {
    LevelSpec {
        inputs_required,
        time_limit_secs,
        zone_width,
    }
}

/// Campaign levels, in order
pub const CAMPAIGN_LEVELS: [LevelSpec; 10] = [
    level(3, 40, 120),
    level(3, 35, 100),
    level(4, 40, 90),
    level(4, 35, 80),
    level(5, 40, 75),
    level(5, 35, 70),
    level(6, 40, 65),
    level(6, 35, 60),
    level(7, 40, 55),
    level(8, 45, 50),
];

/// Endless zone width after the `hits`-th hit, given the current width
pub fn endless_width_after(hits: u32, width: u16) -> u16 {
    if hits > 0 && hits.is_multiple_of(ENDLESS_SHRINK_EVERY) {
        width.saturating_sub(ENDLESS_SHRINK_STEP).max(ENDLESS_MIN_WIDTH)
    } else {
        width
    }
}

/// Per-run tuning taken from settings
#[derive(Debug, Clone)]
pub struct RunRules {
    pub freeze: FreezeOdds,
    pub max_freeze_events: u32,
    pub button_debounce: Duration,
}

impl RunRules {
    pub fn for_mode(mode: GameMode, settings: &Settings) -> Self {
        let freeze = match mode {
            GameMode::Campaign => settings.campaign_freeze.clone(),
            GameMode::Endless => settings.endless_freeze.clone(),
        };
        Self {
            freeze,
            max_freeze_events: settings.max_freeze_events,
            button_debounce: settings.button_debounce(),
        }
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub phase: Phase,
    pub lives: u8,
    /// Campaign score: sum of time left at each level clear
    pub score: u32,
    /// Endless score: successful presses
    pub hits: u32,
    /// Current campaign level (0-based)
    pub level_index: usize,
    /// Presses still needed to clear the campaign level
    pub inputs_left: u32,
    /// Whole seconds left on the clock
    pub time_left: i32,
    /// Width used when placing the next zone
    pub zone_width: u16,
    /// Freeze challenges triggered this run
    pub events_used: u32,
    /// Ticks since the last injection roll
    pub event_counter: u32,
    pub cursor: CursorState,
    pub zones: SuccessZoneEngine,
    /// Ticks run
    pub tick_count: u64,
    /// Clock reading when the run began
    pub started_at: Duration,
    /// Clock reading of the last countdown step
    pub last_second: Duration,
    pub press: PressDetector,
    pub rules: RunRules,
    event_rng: Pcg32,
}

impl SessionState {
    fn new(mode: GameMode, difficulty: Difficulty, lives: u8, seed: u64, now: Duration, settings: &Settings) -> Self {
        let rules = RunRules::for_mode(mode, settings);
        Self {
            mode,
            difficulty,
            phase: Phase::LevelRunning,
            lives,
            score: 0,
            hits: 0,
            level_index: 0,
            inputs_left: 0,
            time_left: 0,
            zone_width: ENDLESS_START_WIDTH,
            events_used: 0,
            event_counter: 0,
            cursor: CursorState::default(),
            zones: SuccessZoneEngine::new(seed, ENDLESS_START_WIDTH),
            tick_count: 0,
            started_at: now,
            last_second: now,
            press: PressDetector::new(rules.button_debounce),
            rules,
            // Separate stream so zone placement doesn't shift with event rolls
            event_rng: Pcg32::new(seed, 0xa02b_dbf7_bb3c_0a7),
        }
    }

    /// New campaign run at level 1
    pub fn campaign(difficulty: Difficulty, seed: u64, now: Duration, settings: &Settings) -> Self {
        let mut state = Self::new(GameMode::Campaign, difficulty, difficulty.starting_lives(), seed, now, settings);
        state.start_level(now);
        state
    }

    /// New endless run
    pub fn endless(seed: u64, now: Duration, settings: &Settings) -> Self {
        let mut state = Self::new(GameMode::Endless, Difficulty::Easy, ENDLESS_START_LIVES, seed, now, settings);
        state.time_left = ENDLESS_START_SECS;
        state.zone_width = ENDLESS_START_WIDTH;
        state.zones.randomize(state.zone_width);
        state
    }

    /// Spec of the current campaign level
    pub fn level(&self) -> Option<&LevelSpec> {
        match self.mode {
            GameMode::Campaign => CAMPAIGN_LEVELS.get(self.level_index),
            GameMode::Endless => None,
        }
    }

    /// (Re)enter the current campaign level with fresh timers, zone and cursor.
    ///
    /// Score, lives and the level index carry over.
    pub fn start_level(&mut self, now: Duration) {
        if let Some(spec) = self.level().copied() {
            self.inputs_left = spec.inputs_required;
            self.time_left = spec.time_limit_secs;
            self.zone_width = spec.zone_width;
        }
        self.cursor = CursorState::default();
        self.event_counter = 0;
        self.zones.randomize(self.zone_width);
        self.phase = Phase::LevelRunning;
        self.resync(now);
    }

    /// Restart the countdown reference after a nested loop returns
    pub fn resync(&mut self, now: Duration) {
        self.last_second = now;
    }

    /// Take one life; returns the lives left
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.phase = if self.lives == 0 {
            Phase::GameOver
        } else {
            Phase::LifeLost
        };
        self.lives
    }

    /// Score that counts for the ledger in this mode
    pub fn ranked_score(&self) -> u32 {
        match self.mode {
            GameMode::Campaign => self.score,
            GameMode::Endless => self.hits,
        }
    }

    /// Ledger tag stored next to the score
    pub fn ranked_tag(&self) -> &'static str {
        match self.mode {
            GameMode::Campaign => self.difficulty.as_str(),
            GameMode::Endless => GameMode::Endless.as_str(),
        }
    }

    /// Seconds since the run began
    pub fn elapsed_secs(&self, now: Duration) -> u64 {
        now.saturating_sub(self.started_at).as_secs()
    }

    pub(crate) fn event_rng(&mut self) -> &mut Pcg32 {
        &mut self.event_rng
    }
}
