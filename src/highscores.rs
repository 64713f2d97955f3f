//! High score ledger
//!
//! Top 3 per game mode, persisted as one text file per mode with one
//! `INITIALS,SCORE,TAG` record per line. The file is reloaded before every
//! query and rewritten after every insert, so nothing is cached between runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::sim::GameMode;

/// Entries kept per mode
pub const MAX_HIGH_SCORES: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    /// Two letters
    pub initials: String,
    pub score: u32,
    /// Difficulty for campaign runs, mode name for endless
    pub tag: String,
}

impl RankEntry {
    pub fn new(initials: &str, score: u32, tag: &str) -> Self {
        Self {
            initials: initials.to_string(),
            score,
            tag: tag.to_string(),
        }
    }

    /// Parse one `INITIALS,SCORE,TAG` line
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.trim().split(',');
        let initials = parts.next()?.trim();
        let score = parts.next()?.trim().parse().ok()?;
        let tag = parts.next()?.trim();
        if parts.next().is_some() || initials.is_empty() {
            return None;
        }
        Some(Self::new(initials, score, tag))
    }

    pub fn to_line(&self) -> String {
        format!("{},{},{}\n", self.initials, self.score, self.tag)
    }
}

/// In-memory leaderboard for one mode, sorted descending by score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<RankEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from file text, skipping blank and malformed lines
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match RankEntry::parse_line(line) {
                Some(entry) => entries.push(entry),
                None => log::warn!("Skipping malformed score line {:?}", line),
            }
        }
        Self { entries }
    }

    pub fn to_text(&self) -> String {
        self.entries.iter().map(RankEntry::to_line).collect()
    }

    /// Check if a score would make the top 3
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries
            .iter()
            .map(|e| e.score)
            .min()
            .is_none_or(|lowest| score > lowest)
    }

    /// Rank (1-based) a score would land at, None outside the top 3.
    ///
    /// Inserts a sentinel, stable-sorts, and looks for the sentinel; an equal
    /// existing score therefore ranks ahead of the candidate.
    pub fn rank(&self, score: u32) -> Option<usize> {
        let mut trial: Vec<(u32, bool)> = self.entries.iter().map(|e| (e.score, false)).collect();
        trial.push((score, true));
        trial.sort_by(|a, b| b.0.cmp(&a.0));
        let pos = trial.iter().position(|&(_, sentinel)| sentinel)?;
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Append, re-sort (stable) and keep the top 3
    pub fn insert(&mut self, entry: RankEntry) {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// File-backed ledger covering every mode
#[derive(Debug, Clone)]
pub struct RankLedger {
    dir: PathBuf,
}

impl RankLedger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Score file for a mode
    pub fn path_for(&self, mode: GameMode) -> PathBuf {
        self.dir.join(format!("scores_{}.txt", mode.as_str().to_lowercase()))
    }

    /// Load a mode's board; a missing or unreadable file reads as empty
    pub fn load(&self, mode: GameMode) -> Leaderboard {
        let path = self.path_for(mode);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let board = Leaderboard::parse(&text);
                log::info!("Loaded {} {} scores", board.entries.len(), mode.as_str());
                board
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No {} scores yet", mode.as_str());
                Leaderboard::new()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Leaderboard::new()
            }
        }
    }

    pub fn save(&self, mode: GameMode, board: &Leaderboard) -> Result<(), LedgerError> {
        let path = self.path_for(mode);
        write_file(&path, &board.to_text())?;
        log::info!("{} scores saved ({} entries)", mode.as_str(), board.entries.len());
        Ok(())
    }

    pub fn is_qualifying(&self, score: u32, mode: GameMode) -> bool {
        self.load(mode).qualifies(score)
    }

    pub fn rank(&self, score: u32, mode: GameMode) -> Option<usize> {
        self.load(mode).rank(score)
    }

    /// Insert and persist, returning the updated board
    pub fn insert(&self, entry: RankEntry, mode: GameMode) -> Result<Leaderboard, LedgerError> {
        log::info!("Adding {} score {} {} ({})", mode.as_str(), entry.initials, entry.score, entry.tag);
        let mut board = self.load(mode);
        board.insert(entry);
        self.save(mode, &board)?;
        Ok(board)
    }
}

fn write_file(path: &Path, text: &str) -> Result<(), LedgerError> {
    fs::write(path, text).map_err(|source| LedgerError::Io {
        path: path.display().to_string(),
        source,
    })
}
