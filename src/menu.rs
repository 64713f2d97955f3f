//! Dial-driven prompts
//!
//! Every prompt is the same loop: turning the dial moves a selection, a press
//! confirms it. Each prompt takes over the thread until it resolves.

use std::time::Duration;

use crate::error::HardwareError;
use crate::highscores::RankLedger;
use crate::hw::{Board, colors};
use crate::input::PressDetector;
use crate::screen::{Headline, MenuChoice, Screen};
use crate::settings::Settings;
use crate::sim::{Difficulty, GameMode, RunOutcome};

const LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// How detents move the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stride {
    /// One option per poll, whatever the detent count (menus)
    Single,
    /// One option per detent (letter wheel)
    Detents,
}

/// Run a selection loop over `count` options and return the confirmed index
fn select(
    board: &mut Board,
    settings: &Settings,
    count: usize,
    initial: usize,
    stride: Stride,
    mut draw: impl FnMut(&mut Board, usize),
) -> Result<usize, HardwareError> {
    let mut press = PressDetector::new(settings.button_debounce());
    let poll: Duration = settings.tick_interval();
    let count = count.max(1) as i32;
    let mut index = initial as i32 % count;
    draw(board, index as usize);

    loop {
        let delta = board.poll_dial()?;
        if delta != 0 {
            let step = match stride {
                Stride::Single => delta.signum(),
                Stride::Detents => delta,
            };
            index = (index + step).rem_euclid(count);
            draw(board, index as usize);
        }
        if press.update(board.button_down()?, board.now()) {
            return Ok(index as usize);
        }
        board.sleep(poll);
    }
}

/// PLAY / ENDLESS / SCOREBOARD
pub fn main_menu(board: &mut Board, settings: &Settings) -> Result<MenuChoice, HardwareError> {
    board.set_color(colors::CYAN);
    let index = select(board, settings, MenuChoice::ALL.len(), 0, Stride::Single, |b, i| {
        b.show(&Screen::MainMenu {
            selected: MenuChoice::ALL[i],
        })
    })?;
    let choice = MenuChoice::ALL[index];
    log::info!("Menu: {}", choice.label());
    Ok(choice)
}

fn difficulty_color(d: Difficulty) -> crate::hw::Rgb {
    match d {
        Difficulty::Easy => colors::GREEN,
        Difficulty::Medium => colors::AMBER,
        Difficulty::Hard => colors::RED,
    }
}

pub fn select_difficulty(board: &mut Board, settings: &Settings) -> Result<Difficulty, HardwareError> {
    let index = select(board, settings, Difficulty::ALL.len(), 0, Stride::Single, |b, i| {
        let d = Difficulty::ALL[i];
        b.set_color(difficulty_color(d));
        b.show(&Screen::DifficultySelect { selected: d });
    })?;
    let difficulty = Difficulty::ALL[index];
    log::info!("Difficulty: {}", difficulty.as_str());
    Ok(difficulty)
}

/// Two letters, each picked on the A-Z wheel and confirmed with a press
pub fn enter_initials(board: &mut Board, settings: &Settings) -> Result<String, HardwareError> {
    board.set_color(colors::YELLOW);
    let mut letters = ['A', 'A'];
    for editing in 0..letters.len() {
        let start = LETTERS.iter().position(|&c| c == letters[editing]).unwrap_or(0);
        let chosen = select(board, settings, LETTERS.len(), start, Stride::Detents, |b, i| {
            letters[editing] = LETTERS[i];
            b.show(&Screen::InitialsEntry { letters, editing });
        })?;
        letters[editing] = LETTERS[chosen];
    }
    Ok(letters.iter().collect())
}

/// Play again or leave, after a victory or a game over
pub fn play_again(board: &mut Board, settings: &Settings, headline: Headline) -> Result<RunOutcome, HardwareError> {
    let index = select(board, settings, 2, 0, Stride::Single, |b, i| {
        b.show(&Screen::PlayAgain {
            headline,
            again: i == 0,
        })
    })?;
    Ok(if index == 0 {
        RunOutcome::Restart
    } else {
        RunOutcome::Exit
    })
}

/// Browse both leaderboards; a press returns to the menu
pub fn show_scoreboard(board: &mut Board, settings: &Settings, ledger: &RankLedger) -> Result<(), HardwareError> {
    board.set_color(colors::GOLD);
    select(board, settings, GameMode::ALL.len(), 0, Stride::Detents, |b, i| {
        let mode = GameMode::ALL[i];
        b.show(&Screen::Scoreboard {
            mode,
            entries: ledger.load(mode).entries,
        });
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::FreezeResult;
    use crate::hw::testkit::{ScriptedLines, rig};

    /// Line states for `n` forward detents at 4 pulses each
    fn forward(n: usize) -> Vec<(bool, bool)> {
        [(false, true), (true, true), (true, false), (false, false)]
            .iter()
            .copied()
            .cycle()
            .take(4 * n)
            .collect()
    }

    fn backward(n: usize) -> Vec<(bool, bool)> {
        [(true, false), (true, true), (false, true), (false, false)]
            .iter()
            .copied()
            .cycle()
            .take(4 * n)
            .collect()
    }

    #[test]
    fn test_main_menu_turn_and_press() {
        let (mut board, rig) = rig(
            &Settings::default(),
            Box::new(ScriptedLines::new(forward(1))),
            FreezeResult::Success,
            |s| matches!(s, Screen::MainMenu { selected: MenuChoice::Endless }),
        );
        assert_eq!(main_menu(&mut board, &Settings::default()).unwrap(), MenuChoice::Endless);
        assert_eq!(rig.colors.borrow().first(), Some(&colors::CYAN));
    }

    #[test]
    fn test_menu_wraps_backwards() {
        let (mut board, _rig) = rig(
            &Settings::default(),
            Box::new(ScriptedLines::new(backward(1))),
            FreezeResult::Success,
            |s| matches!(s, Screen::DifficultySelect { selected: Difficulty::Hard }),
        );
        assert_eq!(select_difficulty(&mut board, &Settings::default()).unwrap(), Difficulty::Hard);
    }

    #[test]
    fn test_initials_wheel() {
        // Two detents forward on the first letter, none on the second
        let (mut board, rig) = rig(
            &Settings::default(),
            Box::new(ScriptedLines::new(forward(2))),
            FreezeResult::Success,
            |s| {
                matches!(
                    s,
                    Screen::InitialsEntry { letters: ['C', _], editing: 0 }
                        | Screen::InitialsEntry { editing: 1, .. }
                )
            },
        );
        assert_eq!(enter_initials(&mut board, &Settings::default()).unwrap(), "CA");
        assert!(rig.screens.borrow().iter().any(|s| matches!(
            s,
            Screen::InitialsEntry { letters: ['C', 'A'], editing: 1 }
        )));
    }

    #[test]
    fn test_play_again_exit() {
        let (mut board, _rig) = rig(
            &Settings::default(),
            Box::new(ScriptedLines::new(forward(1))),
            FreezeResult::Success,
            |s| matches!(s, Screen::PlayAgain { again: false, .. }),
        );
        let outcome = play_again(&mut board, &Settings::default(), Headline::GameOver).unwrap();
        assert_eq!(outcome, RunOutcome::Exit);
    }
}
