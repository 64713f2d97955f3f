//! Display content handed to the display sink
//!
//! The core never draws. Each screen is a plain value describing what should
//! be on the panel; the display implementation decides how it looks.

use crate::highscores::RankEntry;
use crate::sim::{Difficulty, GameMode, SuccessZone};

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    Endless,
    Scoreboard,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] = [MenuChoice::Play, MenuChoice::Endless, MenuChoice::Scoreboard];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Play => "PLAY",
            MenuChoice::Endless => "ENDLESS",
            MenuChoice::Scoreboard => "SCOREBOARD",
        }
    }
}

/// Heads-up line above the dial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hud {
    /// Campaign: 1-based level and presses still needed
    Level { level: usize, inputs_left: u32 },
    Endless { hits: u32 },
}

/// Why the play-again prompt is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headline {
    Victory { score: u32 },
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Power-on animation, the display owns the frames
    Splash,
    MainMenu {
        selected: MenuChoice,
    },
    DifficultySelect {
        selected: Difficulty,
    },
    /// Looking for the safe
    Connecting,
    EndlessIntro,
    Playing {
        zone: SuccessZone,
        cursor_angle: f32,
        time_left: i32,
        hud: Hud,
    },
    /// Miss penalty; `spin` rotates the star ring
    Stunned {
        time_left: i32,
        spin: u16,
    },
    FreezeWarning,
    FreezeHold,
    LifeLost {
        lives: u8,
    },
    LevelComplete {
        level: usize,
        bonus: i32,
        score: u32,
    },
    NewHighScore {
        rank: Option<usize>,
    },
    MissionComplete {
        score: u32,
    },
    EndlessSummary {
        hits: u32,
        seconds: u64,
        width: u16,
    },
    /// Play again (`again == true`) or leave
    PlayAgain {
        headline: Headline,
        again: bool,
    },
    InitialsEntry {
        letters: [char; 2],
        editing: usize,
    },
    Scoreboard {
        mode: GameMode,
        entries: Vec<RankEntry>,
    },
    Fault {
        message: String,
    },
}
