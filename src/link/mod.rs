//! Lock link: command/response protocol to the safe actuator
//!
//! Newline-terminated ASCII over an already-established byte channel.
//! Requests are `LOCK`, `UNLOCK` and `STATUS`; the safe may answer with a
//! line such as `LOCKED` or `UNLOCKED`, or say nothing at all. Answers are
//! never required: after writing, the link waits a fixed interval and reads
//! whatever arrived.
//!
//! The write/read pair assumes nobody else is talking on the channel.

pub mod actuator;

use std::fmt;
use std::io;
use std::time::Duration;

use crate::error::LinkError;
use crate::hw::Clock;

pub use actuator::{LoopbackSafe, SafeActuator};

/// Returned by `status` when nothing usable came back
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Reliable, connected byte stream to the safe
pub trait ByteChannel {
    fn is_connected(&self) -> bool;
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
    /// Bytes ready to read without blocking
    fn available(&self) -> usize;
    /// Read everything currently available
    fn read_available(&mut self) -> io::Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockCommand {
    Lock,
    Unlock,
    Status,
}

impl LockCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockCommand::Lock => "LOCK",
            LockCommand::Unlock => "UNLOCK",
            LockCommand::Status => "STATUS",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "LOCK" => Some(LockCommand::Lock),
            "UNLOCK" => Some(LockCommand::Unlock),
            "STATUS" => Some(LockCommand::Status),
            _ => None,
        }
    }

    /// Wire encoding including the terminator
    pub fn encode(&self) -> Vec<u8> {
        format!("{}\n", self.as_str()).into_bytes()
    }
}

impl fmt::Display for LockCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the safe said back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockResponse {
    Locked,
    Unlocked,
    Other(String),
}

impl LockResponse {
    /// Decode raw response bytes; None if they hold no text
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim();
        match text {
            "" => None,
            "LOCKED" => Some(LockResponse::Locked),
            "UNLOCKED" => Some(LockResponse::Unlocked),
            other => Some(LockResponse::Other(other.to_string())),
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            LockResponse::Locked => "LOCKED",
            LockResponse::Unlocked => "UNLOCKED",
            LockResponse::Other(text) => text,
        }
    }
}

/// Controller side of the lock link
pub struct LockLink {
    channel: Option<Box<dyn ByteChannel>>,
    response_wait: Duration,
}

impl LockLink {
    /// A link with no channel; every command degrades to a no-op
    pub fn disconnected(response_wait: Duration) -> Self {
        Self {
            channel: None,
            response_wait,
        }
    }

    pub fn new(channel: Box<dyn ByteChannel>, response_wait: Duration) -> Self {
        Self {
            channel: Some(channel),
            response_wait,
        }
    }

    /// Swap in a freshly established channel
    pub fn attach(&mut self, channel: Box<dyn ByteChannel>) {
        self.channel = Some(channel);
    }

    pub fn is_established(&self) -> bool {
        self.channel.as_ref().is_some_and(|c| c.is_connected())
    }

    /// Write a command, wait, and read back any response
    pub fn try_send(&mut self, command: LockCommand, clock: &dyn Clock) -> Result<Option<LockResponse>, LinkError> {
        let channel = match self.channel.as_mut() {
            Some(c) if c.is_connected() => c,
            _ => return Err(LinkError::TransportUnavailable),
        };

        channel.write(&command.encode())?;
        log::info!("Sent {}", command);

        clock.sleep(self.response_wait);
        if channel.available() == 0 {
            return Ok(None);
        }
        let response = match channel.read_available() {
            Ok(bytes) => LockResponse::decode(&bytes),
            Err(e) => {
                // The command went out; a garbled answer is as good as none
                log::warn!("Reading response to {} failed: {}", command, e);
                None
            }
        };
        if let Some(r) = &response {
            log::info!("Response: {}", r.as_text());
        }
        Ok(response)
    }

    /// Fire-and-forget send. False only when the link is down or the write
    /// fails.
    pub fn send(&mut self, command: LockCommand, clock: &dyn Clock) -> bool {
        match self.try_send(command, clock) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("{} not sent: {}", command, e);
                false
            }
        }
    }

    pub fn lock(&mut self, clock: &dyn Clock) -> bool {
        self.send(LockCommand::Lock, clock)
    }

    pub fn unlock(&mut self, clock: &dyn Clock) -> bool {
        self.send(LockCommand::Unlock, clock)
    }

    /// Ask the safe for its state; `UNKNOWN` when there is no answer
    pub fn status(&mut self, clock: &dyn Clock) -> String {
        match self.try_send(LockCommand::Status, clock) {
            Ok(Some(response)) => response.as_text().to_string(),
            Ok(None) => UNKNOWN_STATUS.to_string(),
            Err(e) => {
                log::warn!("Status unavailable: {}", e);
                UNKNOWN_STATUS.to_string()
            }
        }
    }
}
