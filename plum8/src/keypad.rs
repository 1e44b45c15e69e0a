//! State of the 16-key hex keypad, as seen by the interpreter.
//!
//! The host feeds key transitions in with `set_held`, the interpreter polls
//! keys and drives the wait-for-key state machine:
//!
//! ```text
//! Idle --begin_wait--> WaitingForKey --key released--> KeyCaptured(key)
//!   ^                                                        |
//!   +--------------------------take_captured-----------------+
//! ```

use crate::error::Error;

/// Number of keys on the keypad
pub const KEY_COUNT: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitState {
    Idle,
    WaitingForKey,
    KeyCaptured(u8),
}

#[derive(Debug)]
pub struct Keypad {
    held: [bool; KEY_COUNT],
    state: WaitState,
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            held: [false; KEY_COUNT],
            state: WaitState::Idle,
        }
    }

    /// Is `key` currently held down, keys outside of the keypad never are
    pub fn is_held(&self, key: u8) -> bool {
        self.held.get(key as usize).copied().unwrap_or(false)
    }

    /// Record a key transition coming from the input device
    ///
    /// Only a release captures a key for a pending wait, presses alone never do.
    pub fn set_held(&mut self, key: u8, held: bool) -> Result<(), Error> {
        let slot = self
            .held
            .get_mut(key as usize)
            .ok_or(Error::InvalidKey(key))?;
        let released = *slot && !held;
        *slot = held;
        if released && self.state == WaitState::WaitingForKey {
            self.state = WaitState::KeyCaptured(key);
        }
        Ok(())
    }

    pub fn wait_state(&self) -> WaitState {
        self.state
    }

    /// Start waiting for the next key release, no-op unless idle
    pub fn begin_wait(&mut self) {
        if self.state == WaitState::Idle {
            self.state = WaitState::WaitingForKey;
        }
    }

    /// Hand out the captured key and go back to idle
    pub fn take_captured(&mut self) -> Option<u8> {
        match self.state {
            WaitState::KeyCaptured(key) => {
                self.state = WaitState::Idle;
                Some(key)
            }
            _ => None,
        }
    }

    pub fn as_raw(&self) -> &[bool; KEY_COUNT] {
        &self.held
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}
