//! Per-tick level logic
//!
//! One call runs the fixed per-tick protocol in order: freeze challenge roll,
//! countdown, cursor integration, then the debounced button. Anything that
//! needs a nested sub-loop (freeze challenge, stun penalty, life loss, level
//! screens) is reported back as a `TickEvent` for the session driver to run.

use std::time::Duration;

use rand::Rng;

use super::state::{CAMPAIGN_LEVELS, GameMode, Phase, SessionState, endless_width_after};
use crate::consts::*;

/// Inputs sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Clock reading for this tick
    pub now: Duration,
    /// Detents turned since the last tick
    pub delta: i32,
    /// Raw button level (true = held down)
    pub button_down: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing the driver needs to act on
    Idle,
    /// A freeze challenge was rolled and must run now
    FreezeChallenge,
    /// The countdown reached zero
    TimeExpired,
    /// Correct press, level continues
    Hit,
    /// Press outside the zone
    Miss,
    /// Campaign level cleared, `bonus` seconds added to the score
    LevelCleared { bonus: i32 },
    /// Final campaign level cleared
    CampaignComplete { bonus: i32 },
}

/// Advance a running level by one tick
pub fn tick(state: &mut SessionState, input: &TickInput) -> TickEvent {
    if state.phase != Phase::LevelRunning {
        return TickEvent::Idle;
    }

    state.tick_count += 1;

    // Freeze challenge injection
    state.event_counter += 1;
    if state.event_counter >= state.rules.freeze.window_ticks {
        state.event_counter = 0;
        let chance = state.rules.freeze.probability();
        if state.events_used < state.rules.max_freeze_events && state.event_rng().random_bool(chance) {
            state.events_used += 1;
            log::info!("Freeze challenge {} of {}", state.events_used, state.rules.max_freeze_events);
            return TickEvent::FreezeChallenge;
        }
    }

    // Countdown
    if input.now.saturating_sub(state.last_second) >= ONE_SECOND {
        state.last_second = input.now;
        state.time_left -= 1;
        if state.time_left <= 0 {
            return TickEvent::TimeExpired;
        }
    }

    // Cursor
    state.cursor = state.cursor.tick(input.delta);

    // Button
    if !state.press.update(input.button_down, input.now) {
        return TickEvent::Idle;
    }
    if state.zones.contains(state.cursor.angle) {
        register_hit(state)
    } else {
        log::debug!(
            "Miss at {:.1}° (zone {}-{})",
            state.cursor.angle,
            state.zones.zone().start,
            state.zones.zone().end
        );
        TickEvent::Miss
    }
}

fn register_hit(state: &mut SessionState) -> TickEvent {
    match state.mode {
        GameMode::Campaign => {
            state.inputs_left = state.inputs_left.saturating_sub(1);
            state.zones.randomize(state.zone_width);

            if state.inputs_left > 0 {
                return TickEvent::Hit;
            }

            let bonus = state.time_left;
            state.score += bonus.max(0) as u32;
            state.level_index += 1;
            log::info!(
                "Level {} cleared with {}s left, score {}",
                state.level_index,
                bonus,
                state.score
            );

            if state.level_index >= CAMPAIGN_LEVELS.len() {
                state.phase = Phase::Victory;
                TickEvent::CampaignComplete { bonus }
            } else {
                state.phase = Phase::LevelTransition;
                TickEvent::LevelCleared { bonus }
            }
        }
        GameMode::Endless => {
            state.hits += 1;
            state.time_left += ENDLESS_HIT_BONUS_SECS;

            let width = endless_width_after(state.hits, state.zone_width);
            if width != state.zone_width {
                log::info!("Endless zone shrinks to {}° after {} hits", width, state.hits);
                state.zone_width = width;
            }
            state.zones.randomize(state.zone_width);
            TickEvent::Hit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Difficulty, SessionState};
    use crate::sim::zone::SuccessZone;

    const TICK_MS: u64 = 10;

    fn quiet_settings() -> Settings {
        let mut s = Settings::default();
        s.campaign_freeze.chance = 0.0;
        s.endless_freeze.chance = 0.0;
        s
    }

    fn at(ms: u64) -> TickInput {
        TickInput {
            now: Duration::from_millis(ms),
            ..Default::default()
        }
    }

    /// Press and release the button starting at `ms`, returning events seen
    fn press(state: &mut SessionState, ms: u64) -> Vec<TickEvent> {
        let mut events = Vec::new();
        events.push(tick(state, &TickInput { button_down: true, ..at(ms) }));
        events.push(tick(state, &at(ms + TICK_MS)));
        events
    }

    /// Put the zone around the resting cursor so the next press hits
    fn aim(state: &mut SessionState) {
        let width = state.zone_width;
        state.zones.set_zone(SuccessZone::new(350, width));
    }

    #[test]
    fn test_three_hits_clear_first_level_with_time_bonus() {
        let mut state = SessionState::campaign(Difficulty::Easy, 11, Duration::ZERO, &quiet_settings());
        assert_eq!(state.level().copied(), Some(CAMPAIGN_LEVELS[0]));

        // Let 5 seconds pass first
        let mut t = 0;
        while t < 5_000 {
            t += TICK_MS;
            assert_eq!(tick(&mut state, &at(t)), TickEvent::Idle);
        }
        assert_eq!(state.time_left, 35);

        // Button has to be seen released once before presses count
        let mut events = Vec::new();
        for _ in 0..3 {
            t += 200;
            aim(&mut state);
            events.extend(press(&mut state, t));
        }
        let hits = events.iter().filter(|e| **e == TickEvent::Hit).count();
        assert_eq!(hits, 2);
        assert!(events.contains(&TickEvent::LevelCleared { bonus: 35 }));
        assert_eq!(state.score, 35);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.phase, Phase::LevelTransition);
    }

    #[test]
    fn test_press_outside_zone_is_a_miss() {
        let mut state = SessionState::campaign(Difficulty::Easy, 11, Duration::ZERO, &quiet_settings());
        state.zones.set_zone(SuccessZone::new(90, 90));
        tick(&mut state, &at(10));
        let events = press(&mut state, 200);
        assert_eq!(events[0], TickEvent::Miss);
        assert_eq!(state.inputs_left, 3);
    }

    #[test]
    fn test_countdown_expires() {
        let mut state = SessionState::campaign(Difficulty::Hard, 5, Duration::ZERO, &quiet_settings());
        let mut t = 0;
        let mut last = TickEvent::Idle;
        while last == TickEvent::Idle {
            t += TICK_MS;
            last = tick(&mut state, &at(t));
        }
        assert_eq!(last, TickEvent::TimeExpired);
        assert_eq!(state.time_left, 0);
        assert_eq!(t, 40_000);
    }

    #[test]
    fn test_resync_prevents_countdown_jump() {
        let mut state = SessionState::campaign(Difficulty::Easy, 5, Duration::ZERO, &quiet_settings());
        // Nested sub-loop swallowed 2.5 seconds
        state.resync(Duration::from_millis(2_500));
        tick(&mut state, &at(2_510));
        assert_eq!(state.time_left, 40);
        tick(&mut state, &at(3_500));
        assert_eq!(state.time_left, 39);
    }

    #[test]
    fn test_final_level_is_victory() {
        let mut state = SessionState::campaign(Difficulty::Easy, 5, Duration::ZERO, &quiet_settings());
        state.level_index = CAMPAIGN_LEVELS.len() - 1;
        state.start_level(Duration::ZERO);
        state.inputs_left = 1;
        tick(&mut state, &at(10));
        aim(&mut state);
        let events = press(&mut state, 200);
        assert_eq!(events[0], TickEvent::CampaignComplete { bonus: 45 });
        assert_eq!(state.phase, Phase::Victory);
        // Stopped ticking
        assert_eq!(tick(&mut state, &at(400)), TickEvent::Idle);
    }

    #[test]
    fn test_endless_hits_extend_time_and_shrink_zone() {
        let mut state = SessionState::endless(3, Duration::ZERO, &quiet_settings());
        tick(&mut state, &at(10));
        let mut t = 10;
        for _ in 0..9 {
            t += 200;
            aim(&mut state);
            assert_eq!(press(&mut state, t)[0], TickEvent::Hit);
        }
        assert_eq!(state.hits, 9);
        assert_eq!(state.zone_width, 94);
        assert_eq!(state.zones.zone().width, 94);
        // 30s bank, +9, minus one second elapsed
        assert_eq!(state.time_left, 38);
    }

    #[test]
    fn test_freeze_injection_is_capped() {
        let mut s = quiet_settings();
        s.campaign_freeze = crate::settings::FreezeOdds {
            window_ticks: 10,
            chance: 1.0,
        };
        let mut state = SessionState::campaign(Difficulty::Easy, 5, Duration::ZERO, &s);
        let mut freezes = 0;
        for i in 1..=100u64 {
            if tick(&mut state, &at(i)) == TickEvent::FreezeChallenge {
                freezes += 1;
            }
        }
        assert_eq!(freezes, 2);
        assert_eq!(state.events_used, 2);
    }

    #[test]
    fn test_dial_moves_cursor() {
        let mut state = SessionState::campaign(Difficulty::Easy, 5, Duration::ZERO, &quiet_settings());
        tick(&mut state, &TickInput { delta: 3, ..at(10) });
        assert!(state.cursor.angle > 5.0);
        assert!(state.cursor.velocity > 0.0);
    }
}
