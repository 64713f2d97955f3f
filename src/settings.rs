//! Controller settings
//!
//! Persisted as JSON next to the firmware. Unknown or missing fields fall back
//! to defaults so older files keep loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Odds of a freeze challenge: one roll every `window_ticks` ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeOdds {
    pub window_ticks: u32,
    /// Probability per roll (0.0 - 1.0)
    pub chance: f64,
}

impl FreezeOdds {
    /// Chance clamped into a valid probability
    pub fn probability(&self) -> f64 {
        if self.chance.is_nan() {
            0.0
        } else {
            self.chance.clamp(0.0, 1.0)
        }
    }
}

/// Controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Encoder ===
    /// Raw quadrature pulses per mechanical click
    pub pulses_per_detent: i32,
    /// Minimum spacing between accepted encoder state changes
    pub encoder_min_interval_ms: u64,

    // === Button ===
    pub button_debounce_ms: u64,

    // === Loop pacing ===
    /// Sleep between game loop iterations
    pub tick_interval_ms: u64,

    // === Lock link ===
    /// How long to wait for the safe to answer a command
    pub link_response_wait_ms: u64,
    /// Endless runs at least this long unlock the safe
    pub endless_unlock_after_secs: u64,

    // === Freeze challenges ===
    pub campaign_freeze: FreezeOdds,
    pub endless_freeze: FreezeOdds,
    /// Cap per run
    pub max_freeze_events: u32,

    // === Storage ===
    /// Directory holding the per-mode score files
    pub scores_dir: PathBuf,

    /// Fixed RNG seed (None = random per run)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pulses_per_detent: 4,
            encoder_min_interval_ms: 1,

            button_debounce_ms: 150,

            tick_interval_ms: 10,

            link_response_wait_ms: 200,
            endless_unlock_after_secs: 120,

            campaign_freeze: FreezeOdds {
                window_ticks: 200,
                chance: 0.01,
            },
            endless_freeze: FreezeOdds {
                window_ticks: 500,
                chance: 0.005,
            },
            max_freeze_events: 2,

            scores_dir: PathBuf::from("."),

            seed: None,
        }
    }
}

impl Settings {
    pub fn encoder_min_interval(&self) -> Duration {
        Duration::from_millis(self.encoder_min_interval_ms)
    }

    pub fn button_debounce(&self) -> Duration {
        Duration::from_millis(self.button_debounce_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn link_response_wait(&self) -> Duration {
        Duration::from_millis(self.link_response_wait_ms)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::info!("No settings at {} ({}), using defaults", path.display(), e),
        }
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
