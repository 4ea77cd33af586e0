//! # Input translator
//!
//! Maps raw keyboard events onto operator inputs. Operating system key
//! repeats are dropped so that only the first press and the eventual release
//! of a key reach the controller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::collections::HashMap;
use teleop_if::input::{Key, KeyEvent, KeyKind};

use crate::direction::{AxisDir, Direction};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Key bindings, configurable from the parameter file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyMapParams {
    pub front: Key,
    pub back: Key,
    pub left: Key,
    pub right: Key,
    pub head_up: Key,
    pub head_down: Key,
    pub lift_up: Key,
    pub lift_down: Key,
    pub toggle_pause: Key,
}

/// Translates key events into operator inputs.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<Key, Binding>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Whether an input started or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Press,
    Release
}

/// An input from the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorInput {
    Drive(Direction, Edge),
    Head(AxisDir, Edge),
    Lift(AxisDir, Edge),
    TogglePause
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Drive(Direction),
    Head(AxisDir),
    Lift(AxisDir),
    TogglePause
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for KeyMapParams {
    fn default() -> Self {
        Self {
            front: Key::Up,
            back: Key::Down,
            left: Key::Left,
            right: Key::Right,
            head_up: Key::Char('z'),
            head_down: Key::Char('s'),
            lift_up: Key::Char('p'),
            lift_down: Key::Char('m'),
            toggle_pause: Key::Space,
        }
    }
}

impl KeyMap {
    pub fn new(params: &KeyMapParams) -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(params.front, Binding::Drive(Direction::Front));
        bindings.insert(params.back, Binding::Drive(Direction::Back));
        bindings.insert(params.left, Binding::Drive(Direction::Left));
        bindings.insert(params.right, Binding::Drive(Direction::Right));
        bindings.insert(params.head_up, Binding::Head(AxisDir::Up));
        bindings.insert(params.head_down, Binding::Head(AxisDir::Down));
        bindings.insert(params.lift_up, Binding::Lift(AxisDir::Up));
        bindings.insert(params.lift_down, Binding::Lift(AxisDir::Down));
        bindings.insert(params.toggle_pause, Binding::TogglePause);

        Self { bindings }
    }

    /// Translate a key event, `None` if the event should be ignored.
    pub fn translate(&self, event: &KeyEvent) -> Option<OperatorInput> {
        if event.auto_repeat {
            return None
        }

        let edge = match event.kind {
            KeyKind::Pressed => Edge::Press,
            KeyKind::Released => Edge::Release
        };

        match (self.bindings.get(&event.key)?, edge) {
            (Binding::Drive(d), e) => Some(OperatorInput::Drive(*d, e)),
            (Binding::Head(a), e) => Some(OperatorInput::Head(*a, e)),
            (Binding::Lift(a), e) => Some(OperatorInput::Lift(*a, e)),
            (Binding::TogglePause, Edge::Press) => Some(OperatorInput::TogglePause),
            (Binding::TogglePause, Edge::Release) => None
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(&KeyMapParams::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let km = KeyMap::default();

        assert_eq!(
            km.translate(&KeyEvent::pressed(Key::Up)), 
            Some(OperatorInput::Drive(Direction::Front, Edge::Press))
        );
        assert_eq!(
            km.translate(&KeyEvent::released(Key::Right)), 
            Some(OperatorInput::Drive(Direction::Right, Edge::Release))
        );
        assert_eq!(
            km.translate(&KeyEvent::pressed(Key::Char('s'))), 
            Some(OperatorInput::Head(AxisDir::Down, Edge::Press))
        );
        assert_eq!(
            km.translate(&KeyEvent::released(Key::Char('p'))), 
            Some(OperatorInput::Lift(AxisDir::Up, Edge::Release))
        );
        assert_eq!(
            km.translate(&KeyEvent::pressed(Key::Space)), 
            Some(OperatorInput::TogglePause)
        );
        assert_eq!(km.translate(&KeyEvent::released(Key::Space)), None);
        assert_eq!(km.translate(&KeyEvent::pressed(Key::Char('q'))), None);
    }

    #[test]
    fn test_auto_repeat_dropped() {
        let km = KeyMap::default();

        assert_eq!(km.translate(&KeyEvent::pressed(Key::Up).repeated()), None);
        assert_eq!(km.translate(&KeyEvent::released(Key::Up).repeated()), None);
        assert_eq!(km.translate(&KeyEvent::pressed(Key::Space).repeated()), None);
    }

    #[test]
    fn test_custom_bindings() {
        let params = KeyMapParams {
            front: Key::Char('w'),
            ..Default::default()
        };
        let km = KeyMap::new(&params);

        assert_eq!(
            km.translate(&KeyEvent::pressed(Key::Char('w'))), 
            Some(OperatorInput::Drive(Direction::Front, Edge::Press))
        );
        assert_eq!(km.translate(&KeyEvent::pressed(Key::Up)), None);
    }
}
