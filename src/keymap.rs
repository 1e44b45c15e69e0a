//! QWERTY to hex keypad mapping and scripted key input.
//!
//! ```text
//! 1 2 3 4        1 2 3 C
//! q w e r   ->   4 5 6 D
//! a s d f        7 8 9 E
//! z x c v        A 0 B F
//! ```

use std::fmt;
use std::str::FromStr;

use log::{debug, error};

use plum8::Keypad;

/// Keyboard characters and the hex keys they stand for, row by row
#[rustfmt::skip]
const KEYMAP: [(char, u8); 16] = [
    ('1', 0x1), ('2', 0x2), ('3', 0x3), ('4', 0xC),
    ('q', 0x4), ('w', 0x5), ('e', 0x6), ('r', 0xD),
    ('a', 0x7), ('s', 0x8), ('d', 0x9), ('f', 0xE),
    ('z', 0xA), ('x', 0x0), ('c', 0xB), ('v', 0xF),
];

/// Hex key bound to keyboard character `c`
pub fn map_key(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    KEYMAP
        .iter()
        .find(|&&(bound, _)| bound == c)
        .map(|&(_, key)| key)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyHoldError {
    Syntax(String),
    UnknownKey(char),
    EmptyRange { from: usize, to: usize },
}

impl fmt::Display for KeyHoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyHoldError::Syntax(s) => write!(f, "expected <key>@<from>..<to>, got {:?}", s),
            KeyHoldError::UnknownKey(c) => write!(f, "{:?} is not bound to any key", c),
            KeyHoldError::EmptyRange { from, to } => {
                write!(f, "key would be released at {} before it is pressed at {}", to, from)
            }
        }
    }
}

impl std::error::Error for KeyHoldError {}

/// Key held down from frame `from` up to, not including, frame `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHold {
    pub key: u8,
    pub from: usize,
    pub to: usize,
}

impl FromStr for KeyHold {
    type Err = KeyHoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || KeyHoldError::Syntax(s.to_owned());

        let (key, range) = s.split_once('@').ok_or_else(syntax)?;
        let mut chars = key.chars();
        let c = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(syntax()),
        };
        let key = map_key(c).ok_or(KeyHoldError::UnknownKey(c))?;

        let (from, to) = range.split_once("..").ok_or_else(syntax)?;
        let from = from.trim().parse::<usize>().map_err(|_| syntax())?;
        let to = to.trim().parse::<usize>().map_err(|_| syntax())?;
        if to <= from {
            return Err(KeyHoldError::EmptyRange { from, to });
        }
        Ok(Self { key, from, to })
    }
}

/// Key presses and releases replayed frame by frame
#[derive(Debug, Default, Clone)]
pub struct KeyScript(Vec<KeyHold>);

impl KeyScript {
    pub fn new(holds: Vec<KeyHold>) -> Self {
        Self(holds)
    }

    /// Feed transitions scheduled for frame number `frame` to the keypad
    pub fn apply(&self, frame: usize, keypad: &mut Keypad) {
        for hold in &self.0 {
            let held = if hold.from == frame {
                true
            } else if hold.to == frame {
                false
            } else {
                continue;
            };
            debug!("frame {}: key {:X} {}", frame, hold.key, if held { "down" } else { "up" });
            if let Err(err) = keypad.set_held(hold.key, held) {
                error!("frame {}: {}", frame, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plum8::WaitState;

    #[test]
    fn qwerty_layout() {
        let mapped: Vec<u8> = "1234qwerasdfzxcv".chars().filter_map(map_key).collect();
        assert_eq!(
            mapped,
            vec![0x1, 0x2, 0x3, 0xC, 0x4, 0x5, 0x6, 0xD, 0x7, 0x8, 0x9, 0xE, 0xA, 0x0, 0xB, 0xF]
        );
        assert_eq!(map_key('Q'), Some(0x4));
        assert_eq!(map_key('p'), None);
    }

    #[test]
    fn every_key_bound_once() {
        let mut keys: Vec<u8> = KEYMAP.iter().map(|&(_, key)| key).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0x0..=0xF).collect::<Vec<u8>>());
    }

    #[test]
    fn script_skips_keys_off_the_keypad() {
        let script = KeyScript::new(vec![
            KeyHold { key: 0x10, from: 0, to: 1 },
            KeyHold { key: 0x3, from: 0, to: 1 },
        ]);
        let mut keypad = Keypad::new();
        script.apply(0, &mut keypad);
        assert!(keypad.is_held(0x3));
        assert!(!keypad.is_held(0x10));
        assert_eq!(keypad.as_raw().iter().filter(|&&held| held).count(), 1);
    }

    #[test]
    fn parse_key_hold() {
        assert_eq!(
            "x@10..12".parse::<KeyHold>(),
            Ok(KeyHold { key: 0x0, from: 10, to: 12 })
        );
        assert_eq!(
            "V@0..1".parse::<KeyHold>(),
            Ok(KeyHold { key: 0xF, from: 0, to: 1 })
        );
    }

    #[test]
    fn parse_key_hold_errors() {
        assert_eq!("p@1..2".parse::<KeyHold>(), Err(KeyHoldError::UnknownKey('p')));
        assert_eq!(
            "q@5..5".parse::<KeyHold>(),
            Err(KeyHoldError::EmptyRange { from: 5, to: 5 })
        );
        for bad in &["q", "qw@1..2", "q@1", "q@a..2", "@1..2"] {
            assert_eq!(
                bad.parse::<KeyHold>(),
                Err(KeyHoldError::Syntax(bad.to_string()))
            );
        }
    }

    #[test]
    fn script_presses_and_releases() {
        let script = KeyScript::new(vec![KeyHold { key: 0x5, from: 2, to: 4 }]);
        let mut keypad = Keypad::new();
        keypad.begin_wait();

        script.apply(1, &mut keypad);
        assert!(!keypad.is_held(0x5));
        script.apply(2, &mut keypad);
        assert!(keypad.is_held(0x5));
        script.apply(3, &mut keypad);
        assert_eq!(keypad.wait_state(), WaitState::WaitingForKey);
        script.apply(4, &mut keypad);
        assert!(!keypad.is_held(0x5));
        assert_eq!(keypad.wait_state(), WaitState::KeyCaptured(0x5));
    }
}
