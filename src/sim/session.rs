//! Session driver
//!
//! Runs the poll loop for a game run against a `Controller`. The per-tick
//! rules live in `tick`; this module owns everything that takes the thread
//! away from the loop for a while (freeze challenges, the stun penalty, life
//! loss, level screens, victory and game over) and the bookkeeping needed
//! when the loop gets it back.
//!
//! Every nested step returns a `RunOutcome`. `Restart` and `Exit` unwind
//! straight out through each caller without running any more per-tick logic.

use super::state::{CAMPAIGN_LEVELS, Difficulty, GameMode, Phase, RunOutcome, SessionState};
use super::tick::{TickEvent, TickInput, tick};
use crate::consts::*;
use crate::device::Controller;
use crate::error::GameError;
use crate::highscores::RankEntry;
use crate::hw::{FreezeResult, colors};
use crate::menu;
use crate::screen::{Headline, Hud, Screen};

/// Campaign mode: lock the safe, pick a difficulty, play all levels
pub fn run_campaign(ctl: &mut Controller) -> Result<RunOutcome, GameError> {
    connect_link(ctl);
    let difficulty = menu::select_difficulty(&mut ctl.board, &ctl.settings)?;
    start_campaign(ctl, difficulty)
}

fn start_campaign(ctl: &mut Controller, difficulty: Difficulty) -> Result<RunOutcome, GameError> {
    let seed = ctl.next_seed();
    let mut state = SessionState::campaign(difficulty, seed, ctl.board.now(), &ctl.settings);
    log::info!("Campaign start: {} ({} lives)", difficulty.as_str(), state.lives);
    ctl.board.set_color(colors::for_lives(state.lives));

    play_campaign(ctl, &mut state)
}

/// Play from the current level until the run ends. A cleared level moves on,
/// a lost life replays the same level.
fn play_campaign(ctl: &mut Controller, state: &mut SessionState) -> Result<RunOutcome, GameError> {
    loop {
        log::info!("Level {} of {}", state.level_index + 1, CAMPAIGN_LEVELS.len());
        let outcome = play_level(ctl, state)?;
        if outcome.is_terminal() {
            return Ok(outcome);
        }
        state.start_level(ctl.board.now());
    }
}

/// Play one endless run
pub fn run_endless(ctl: &mut Controller) -> Result<RunOutcome, GameError> {
    connect_link(ctl);

    ctl.board.set_color(colors::for_lives(ENDLESS_START_LIVES));
    ctl.board.show(&Screen::EndlessIntro);
    ctl.board.sleep(ENDLESS_INTRO);

    let seed = ctl.next_seed();
    let mut state = SessionState::endless(seed, ctl.board.now(), &ctl.settings);
    log::info!("Endless start: {}s bank, {}° zone", state.time_left, state.zone_width);

    play_endless(ctl, &mut state)?;
    endless_game_over(ctl, &mut state)
}

/// Show the connecting screen and lock the safe if the link is up
fn connect_link(ctl: &mut Controller) {
    ctl.board.show(&Screen::Connecting);
    ctl.board.set_color(colors::YELLOW);
    ctl.board.sleep(CONNECTING_PAUSE);

    if ctl.link.is_established() {
        ctl.link.lock(&*ctl.board.clock);
    } else {
        log::info!("Playing without the safe");
    }
}

fn read_tick_input(ctl: &mut Controller) -> Result<TickInput, GameError> {
    let now = ctl.board.now();
    let delta = ctl.board.poll_dial()?;
    let button_down = ctl.board.button_down()?;
    Ok(TickInput {
        now,
        delta,
        button_down,
    })
}

fn show_playfield(ctl: &mut Controller, state: &SessionState) {
    let hud = match state.mode {
        GameMode::Campaign => Hud::Level {
            level: state.level_index + 1,
            inputs_left: state.inputs_left,
        },
        GameMode::Endless => Hud::Endless { hits: state.hits },
    };
    ctl.board.show(&Screen::Playing {
        zone: state.zones.zone(),
        cursor_angle: state.cursor.angle,
        time_left: state.time_left,
        hud,
    });
}

/// Run the current campaign level until it is cleared, a life is lost, or
/// the run ends
fn play_level(ctl: &mut Controller, state: &mut SessionState) -> Result<RunOutcome, GameError> {
    let pace = ctl.settings.tick_interval();
    show_playfield(ctl, state);

    loop {
        let input = read_tick_input(ctl)?;
        match tick(state, &input) {
            TickEvent::Idle | TickEvent::Hit => {}
            TickEvent::FreezeChallenge => {
                if ctl.board.run_freeze() == FreezeResult::Fail {
                    return lose_life(ctl, state);
                }
                state.resync(ctl.board.now());
            }
            TickEvent::TimeExpired => return lose_life(ctl, state),
            TickEvent::Miss => {
                stun_penalty(ctl, state);
                if state.time_left <= 0 {
                    return lose_life(ctl, state);
                }
                state.zones.regenerate();
                state.resync(ctl.board.now());
            }
            TickEvent::LevelCleared { bonus } => {
                ctl.board.show(&Screen::LevelComplete {
                    level: state.level_index,
                    bonus,
                    score: state.score,
                });
                ctl.board.sleep(LEVEL_TRANSITION_PAUSE);
                return Ok(RunOutcome::Continue);
            }
            TickEvent::CampaignComplete { .. } => return victory(ctl, state),
        }

        show_playfield(ctl, state);
        ctl.board.sleep(pace);
    }
}

/// Run endless play until the time bank or the lives run out
fn play_endless(ctl: &mut Controller, state: &mut SessionState) -> Result<(), GameError> {
    let pace = ctl.settings.tick_interval();
    show_playfield(ctl, state);

    loop {
        let input = read_tick_input(ctl)?;
        match tick(state, &input) {
            TickEvent::Idle | TickEvent::Hit => {}
            TickEvent::FreezeChallenge => {
                if ctl.board.run_freeze() == FreezeResult::Fail {
                    let lives = state.lose_life();
                    ctl.board.set_color(colors::for_lives(lives));
                    log::info!("Freeze failed, {} lives left", lives);
                    if lives == 0 {
                        return Ok(());
                    }
                    show_life_lost(ctl, lives);
                    state.phase = Phase::LevelRunning;
                }
                state.resync(ctl.board.now());
            }
            TickEvent::TimeExpired => {
                log::info!("Endless time bank empty after {} hits", state.hits);
                return Ok(());
            }
            TickEvent::Miss => {
                stun_penalty(ctl, state);
                if state.time_left <= 0 {
                    return Ok(());
                }
                state.zones.regenerate();
                state.resync(ctl.board.now());
            }
            // Campaign-only events
            TickEvent::LevelCleared { .. } | TickEvent::CampaignComplete { .. } => {}
        }

        show_playfield(ctl, state);
        ctl.board.sleep(pace);
    }
}

/// Miss penalty: the player is stunned for a while and the clock keeps
/// running. Returns early if the clock runs out.
fn stun_penalty(ctl: &mut Controller, state: &mut SessionState) {
    let original = colors::for_lives(state.lives);
    let start = ctl.board.now();
    let mut last_second = start;
    let mut last_flash = start;
    let mut flash = false;
    let mut spin: u16 = 0;

    log::debug!("Stunned with {}s left", state.time_left);
    loop {
        let now = ctl.board.now();
        if now.saturating_sub(start) >= STUN_DURATION {
            break;
        }

        if now.saturating_sub(last_second) >= ONE_SECOND {
            last_second = now;
            state.time_left -= 1;
            if state.time_left <= 0 {
                break;
            }
        }

        if now.saturating_sub(last_flash) >= STUN_FLASH_INTERVAL {
            last_flash = now;
            flash = !flash;
            ctl.board.set_color(if flash { colors::RED } else { colors::OFF });
        }

        ctl.board.show(&Screen::Stunned {
            time_left: state.time_left,
            spin,
        });
        spin = (spin + STUN_SPIN_STEP) % 360;
        ctl.board.sleep(STUN_FRAME);
    }
    ctl.board.set_color(original);
}

fn show_life_lost(ctl: &mut Controller, lives: u8) {
    ctl.board.show(&Screen::LifeLost { lives });
    ctl.board.sleep(LIFE_LOST_PAUSE);
}

/// Campaign life loss. With lives left the level restarts (`Continue`);
/// otherwise the player picks restart or exit.
fn lose_life(ctl: &mut Controller, state: &mut SessionState) -> Result<RunOutcome, GameError> {
    let lives = state.lose_life();
    ctl.board.set_color(colors::for_lives(lives));
    log::info!("Life lost on level {}, {} left", state.level_index + 1, lives);

    if lives == 0 {
        log::info!("Game over with score {}", state.score);
        return Ok(menu::play_again(&mut ctl.board, &ctl.settings, Headline::GameOver)?);
    }

    show_life_lost(ctl, lives);
    Ok(RunOutcome::Continue)
}

/// Final campaign level cleared: open the safe, rank the score, and ask
/// about another go
fn victory(ctl: &mut Controller, state: &mut SessionState) -> Result<RunOutcome, GameError> {
    log::info!("Campaign complete, score {}", state.score);
    if ctl.link.is_established() {
        ctl.link.unlock(&*ctl.board.clock);
    }

    record_high_score(ctl, state)?;

    ctl.board.show(&Screen::MissionComplete { score: state.score });
    ctl.board.set_color(colors::GREEN);
    ctl.board.sleep(MISSION_COMPLETE_PAUSE);

    Ok(menu::play_again(
        &mut ctl.board,
        &ctl.settings,
        Headline::Victory { score: state.score },
    )?)
}

/// End of an endless run
fn endless_game_over(ctl: &mut Controller, state: &mut SessionState) -> Result<RunOutcome, GameError> {
    state.phase = Phase::GameOver;
    let seconds = state.elapsed_secs(ctl.board.now());
    log::info!("Endless over: {} hits in {}s", state.hits, seconds);

    if seconds >= ctl.settings.endless_unlock_after_secs && ctl.link.is_established() {
        ctl.link.unlock(&*ctl.board.clock);
    }

    ctl.board.show(&Screen::EndlessSummary {
        hits: state.hits,
        seconds,
        width: state.zone_width,
    });
    ctl.board.set_color(colors::RED);
    ctl.board.sleep(ENDLESS_SUMMARY_PAUSE);

    record_high_score(ctl, state)?;

    Ok(menu::play_again(&mut ctl.board, &ctl.settings, Headline::GameOver)?)
}

/// Ask for initials and store the run's score if it makes the board
fn record_high_score(ctl: &mut Controller, state: &mut SessionState) -> Result<(), GameError> {
    let score = state.ranked_score();
    if !ctl.ledger.is_qualifying(score, state.mode) {
        return Ok(());
    }

    state.phase = Phase::HighScoreEntry;
    let rank = ctl.ledger.rank(score, state.mode);
    ctl.board.show(&Screen::NewHighScore { rank });
    ctl.board.set_color(colors::GOLD);
    ctl.board.sleep(HIGH_SCORE_PAUSE);

    let initials = menu::enter_initials(&mut ctl.board, &ctl.settings)?;
    let entry = RankEntry::new(&initials, score, state.ranked_tag());
    if let Err(e) = ctl.ledger.insert(entry, state.mode) {
        log::warn!("High score not saved: {}", e);
    }
    Ok(())
}
