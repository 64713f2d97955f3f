//! Error types
//!
//! Most faults are absorbed where they happen: a missing lock link degrades to
//! a no-op, a broken score file reads as empty, and invalid quadrature steps
//! decode as zero movement. Only hardware read failures travel up to the
//! device loop's fault boundary.

use std::io;

use thiserror::Error;

/// A capability read failed
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("encoder lines unreadable: {0}")]
    Lines(String),
    #[error("button unreadable: {0}")]
    Button(String),
    #[error("motion sensor unreadable: {0}")]
    Motion(String),
}

/// Lock link failures
#[derive(Debug, Error)]
pub enum LinkError {
    /// No channel was established, or it has since disconnected
    #[error("lock link not established")]
    TransportUnavailable,
    #[error("lock link transport error: {0}")]
    Transport(#[from] io::Error),
}

/// Score ledger persistence failures
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("score file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Anything that may escape a game run and reach the device loop
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Hardware(#[from] HardwareError),
}
