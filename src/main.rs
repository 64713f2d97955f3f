//! Vault Dial bench check
//!
//! Exercises the parts of the controller that don't need the panel: loads
//! settings, drives the lock link against a simulated safe, and prints both
//! leaderboards. Settings come from the file named by `VAULT_SETTINGS`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use vault_dial::highscores::RankLedger;
    use vault_dial::hw::SystemClock;
    use vault_dial::link::{LockLink, LoopbackSafe};
    use vault_dial::settings::Settings;
    use vault_dial::sim::GameMode;

    env_logger::init();
    log::info!("Vault Dial bench check starting...");

    let settings = match std::env::var_os("VAULT_SETTINGS") {
        Some(path) => Settings::load(&PathBuf::from(path)),
        None => Settings::default(),
    };

    let clock = SystemClock::new();
    let safe = LoopbackSafe::new();
    let actuator = safe.safe();
    let mut link = LockLink::new(Box::new(safe), settings.link_response_wait());

    println!("\nLock link against simulated safe...");
    link.lock(&clock);
    println!("  after LOCK:   {}", link.status(&clock));
    link.unlock(&clock);
    println!("  after UNLOCK: {}", link.status(&clock));
    println!("  servo at {}°", actuator.borrow().angle);

    let ledger = RankLedger::new(settings.scores_dir.clone());
    for mode in GameMode::ALL {
        println!("\n{} high scores ({})", mode.as_str(), ledger.path_for(mode).display());
        let board = ledger.load(mode);
        if board.is_empty() {
            println!("  (none)");
        }
        for (i, entry) in board.entries.iter().enumerate() {
            println!("  {}. {} {:>5} {}", i + 1, entry.initials, entry.score, entry.tag);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
