//! Game rules
//!
//! `state`, `tick`, `cursor` and `zone` are deterministic: seeded RNG only,
//! and time arrives as a value on each tick. `session` and `freeze` run the
//! nested sub-loops against the hardware capabilities.

pub mod cursor;
pub mod freeze;
pub mod session;
pub mod state;
pub mod tick;
pub mod zone;

pub use cursor::CursorState;
pub use freeze::StillnessChallenge;
pub use state::{
    CAMPAIGN_LEVELS, Difficulty, GameMode, LevelSpec, Phase, RunOutcome, RunRules, SessionState,
    endless_width_after,
};
pub use tick::{TickEvent, TickInput, tick};
pub use zone::{SuccessZone, SuccessZoneEngine};
