//! # Keyboard input events
//!
//! Keys are serialised as short names (`"Up"`, `"Space"`, `"z"`) so they can be written by hand
//! in scripts and typed into the console.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A key-down or key-up event from the operator's keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key the event concerns
    pub key: Key,

    /// Whether the key went down or up
    pub kind: KeyKind,

    /// True if the event was generated by the operating system's key repeat rather than by the
    /// operator.
    #[serde(default)]
    pub auto_repeat: bool
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A key on the operator's keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    /// A character key, always stored in lower case.
    Char(char)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyKind {
    Pressed,
    Released
}

/// Error returned when a key name can't be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("\"{0}\" is not a recognised key")]
pub struct KeyParseError(pub String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self { key, kind: KeyKind::Pressed, auto_repeat: false }
    }

    pub fn released(key: Key) -> Self {
        Self { key, kind: KeyKind::Released, auto_repeat: false }
    }

    /// Mark the event as an operating system key repeat.
    pub fn repeated(mut self) -> Self {
        self.auto_repeat = true;
        self
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "space" => Ok(Key::Space),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() => Ok(Key::Char(c)),
                    _ => Err(KeyParseError(s.to_string()))
                }
            }
        }
    }
}

impl TryFrom<String> for Key {
    type Error = KeyParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Space => write!(f, "Space"),
            Key::Char(c) => write!(f, "{}", c)
        }
    }
}
