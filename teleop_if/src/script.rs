//! # Key-event script entries
//!
//! A script replays operator input at fixed times. Each entry is a JSON object which is either a
//! [`KeyEvent`] or one of the operator controls.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::KeyEvent;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An action performed at a scripted time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptAction {
    /// A key event, e.g. `{"key": "Up", "kind": "Pressed"}`
    Key(KeyEvent),

    /// Select a delay profile, e.g. `{"profile": "Mars"}`
    Profile { profile: String },

    /// Set the manual delay in seconds, e.g. `{"delay": 1.5}`
    Delay { delay: f64 },

    /// Pause (`true`) or resume (`false`), e.g. `{"pause": true}`
    Pause { pause: bool },
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum ScriptActionParseError {
    #[error("Action is not a key event or operator control: {0}")]
    InvalidJson(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ScriptAction {
    /// Parse an action from its JSON representation.
    pub fn from_json(json_str: &str) -> Result<Self, ScriptActionParseError> {
        serde_json::from_str(json_str).map_err(ScriptActionParseError::InvalidJson)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::input::Key;

    #[test]
    fn test_from_json() {
        assert_eq!(
            ScriptAction::from_json(r#"{"key": "Left", "kind": "Pressed"}"#).unwrap(),
            ScriptAction::Key(KeyEvent::pressed(Key::Left))
        );
        assert_eq!(
            ScriptAction::from_json(r#"{"profile": "Mars"}"#).unwrap(),
            ScriptAction::Profile { profile: "Mars".into() }
        );
        assert_eq!(
            ScriptAction::from_json(r#"{"delay": 1.5}"#).unwrap(),
            ScriptAction::Delay { delay: 1.5 }
        );
        assert_eq!(
            ScriptAction::from_json(r#"{"pause": true}"#).unwrap(),
            ScriptAction::Pause { pause: true }
        );
        assert!(ScriptAction::from_json(r#"{"jump": 1}"#).is_err());
        assert!(ScriptAction::from_json("not json").is_err());
    }
}
