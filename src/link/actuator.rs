//! Safe side of the lock link
//!
//! The safe drives a servo latch: 0° is locked, 90° unlocked. It answers
//! `LOCK`/`UNLOCK` with the new state and `STATUS` with the current one;
//! unknown commands are logged and ignored.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use super::{ByteChannel, LockCommand};

pub const LOCKED_ANGLE: u8 = 0;
pub const UNLOCKED_ANGLE: u8 = 90;
/// Servo angles above this read back as unlocked
pub const UNLOCKED_ABOVE: u8 = 45;

/// Servo latch state machine
#[derive(Debug, Clone)]
pub struct SafeActuator {
    pub angle: u8,
    /// Every line received, recognised or not
    pub received: Vec<String>,
}

impl Default for SafeActuator {
    fn default() -> Self {
        Self {
            angle: LOCKED_ANGLE,
            received: Vec::new(),
        }
    }
}

impl SafeActuator {
    pub fn is_unlocked(&self) -> bool {
        self.angle > UNLOCKED_ABOVE
    }

    fn state_reply(&self) -> &'static str {
        if self.is_unlocked() { "UNLOCKED" } else { "LOCKED" }
    }

    /// Handle one command line, returning the reply line if any
    pub fn handle_line(&mut self, line: &str) -> Option<&'static str> {
        let line = line.trim();
        self.received.push(line.to_string());
        match LockCommand::parse(line) {
            Some(LockCommand::Unlock) => {
                self.angle = UNLOCKED_ANGLE;
                log::info!("Safe unlocked");
            }
            Some(LockCommand::Lock) => {
                self.angle = LOCKED_ANGLE;
                log::info!("Safe locked");
            }
            Some(LockCommand::Status) => {}
            None => {
                log::warn!("Safe ignoring unknown command {:?}", line);
                return None;
            }
        }
        Some(self.state_reply())
    }
}

/// In-memory channel wired straight into a `SafeActuator`
#[derive(Debug, Clone)]
pub struct LoopbackSafe {
    safe: Rc<RefCell<SafeActuator>>,
    connected: Rc<Cell<bool>>,
    pending: Vec<u8>,
    replies: VecDeque<u8>,
}

impl Default for LoopbackSafe {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackSafe {
    pub fn new() -> Self {
        Self {
            safe: Rc::new(RefCell::new(SafeActuator::default())),
            connected: Rc::new(Cell::new(true)),
            pending: Vec::new(),
            replies: VecDeque::new(),
        }
    }

    /// Shared handle on the simulated safe
    pub fn safe(&self) -> Rc<RefCell<SafeActuator>> {
        self.safe.clone()
    }

    /// Handle for dropping or restoring the connection
    pub fn connection(&self) -> Rc<Cell<bool>> {
        self.connected.clone()
    }
}

impl ByteChannel for LoopbackSafe {
    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !self.connected.get() {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "safe disconnected"));
        }
        self.pending.extend_from_slice(bytes);
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(reply) = self.safe.borrow_mut().handle_line(&line) {
                self.replies.extend(reply.bytes());
                self.replies.push_back(b'\n');
            }
        }
        Ok(())
    }

    fn available(&self) -> usize {
        self.replies.len()
    }

    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.replies.drain(..).collect())
    }
}
