//! Device loop
//!
//! `Controller` owns everything a running game needs: the board, the lock
//! link, the score ledger and the settings. `step` runs one trip through the
//! main menu and is the fault boundary; `run_forever` repeats it.

use crate::consts::{FAULT_PAUSE, SPLASH_DURATION};
use crate::error::GameError;
use crate::highscores::RankLedger;
use crate::hw::{Board, colors};
use crate::link::LockLink;
use crate::menu;
use crate::screen::{MenuChoice, Screen};
use crate::settings::Settings;
use crate::sim::RunOutcome;
use crate::sim::session::{run_campaign, run_endless};

pub struct Controller {
    pub board: Board,
    pub link: LockLink,
    pub ledger: RankLedger,
    pub settings: Settings,
    /// Runs started, used to vary a fixed seed between runs
    runs: u64,
}

impl Controller {
    pub fn new(board: Board, link: LockLink, settings: Settings) -> Self {
        let ledger = RankLedger::new(settings.scores_dir.clone());
        Self {
            board,
            link,
            ledger,
            settings,
            runs: 0,
        }
    }

    /// Seed for the next run: the configured seed offset by the run count,
    /// or fresh entropy
    pub fn next_seed(&mut self) -> u64 {
        let seed = match self.settings.seed {
            Some(base) => base.wrapping_add(self.runs),
            None => rand::random(),
        };
        self.runs += 1;
        log::debug!("Run {} seed {:#x}", self.runs, seed);
        seed
    }

    /// One pass through the main menu. `Restart` replays the chosen mode
    /// until the player exits back here.
    pub fn menu_round(&mut self) -> Result<(), GameError> {
        match menu::main_menu(&mut self.board, &self.settings)? {
            MenuChoice::Play => while run_campaign(self)? == RunOutcome::Restart {},
            MenuChoice::Endless => while run_endless(self)? == RunOutcome::Restart {},
            MenuChoice::Scoreboard => menu::show_scoreboard(&mut self.board, &self.settings, &self.ledger)?,
        }
        Ok(())
    }

    /// Run one menu round, reporting any fault on the panel and the LED
    /// instead of stopping
    pub fn step(&mut self) {
        if let Err(e) = self.menu_round() {
            log::error!("Game aborted: {}", e);
            self.board.show(&Screen::Fault { message: e.to_string() });
            self.board.set_color(colors::PURPLE);
            self.board.sleep(FAULT_PAUSE);
        }
    }

    /// Power-on splash, shown once before the first menu
    pub fn boot(&mut self) {
        log::info!("Controller up, safe link {}", if self.link.is_established() { "ready" } else { "absent" });
        self.board.show(&Screen::Splash);
        self.board.sleep(SPLASH_DURATION);
    }

    pub fn run_forever(&mut self) -> ! {
        self.boot();
        loop {
            self.step();
        }
    }
}
