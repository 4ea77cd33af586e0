//! # Direction stack
//!
//! Tracks which directional keys the operator is holding and resolves them into a single
//! composite intent. Only membership matters for the resolved intent, the press order is kept for
//! reporting.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A direction the operator can drive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Front,
    Back,
    Left,
    Right
}

/// The composite motion derived from the held directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotionIntent {
    Stop,
    Forward,
    Backward,
    Left,
    Right,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight
}

/// Direction of a head or lift input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AxisDir {
    Up,
    Down
}

/// The resolved intent of a head or lift axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisIntent {
    Up,
    Down,
    Hold
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The set of directions currently held, in press order.
#[derive(Debug, Default, Clone)]
pub struct DirectionStack {
    held: Vec<Direction>
}

/// The set of head or lift inputs currently held, in press order.
#[derive(Debug, Default, Clone)]
pub struct AxisInput {
    held: Vec<AxisDir>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DirectionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a direction to the stack.
    ///
    /// Returns `true` if the direction wasn't already held.
    pub fn press(&mut self, dir: Direction) -> bool {
        if self.is_held(dir) {
            return false
        }
        self.held.push(dir);
        true
    }

    /// Remove a direction from the stack.
    ///
    /// Releasing a direction which isn't held is a no-op, releases can race
    /// with pause/resume. Returns `true` if the direction was held.
    pub fn release(&mut self, dir: Direction) -> bool {
        match self.held.iter().position(|&d| d == dir) {
            Some(i) => {
                self.held.remove(i);
                true
            },
            None => false
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held.contains(&dir)
    }

    /// The held directions in press order.
    pub fn held(&self) -> &[Direction] {
        &self.held
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Resolve the held directions into a single motion intent.
    ///
    /// Opposite directions held together cancel each other out.
    pub fn resolve(&self) -> MotionIntent {
        let longitudinal = axis_sign(
            self.is_held(Direction::Front), 
            self.is_held(Direction::Back)
        );
        let lateral = axis_sign(
            self.is_held(Direction::Left), 
            self.is_held(Direction::Right)
        );

        match (longitudinal, lateral) {
            (0, 0) => MotionIntent::Stop,
            (1, 0) => MotionIntent::Forward,
            (-1, 0) => MotionIntent::Backward,
            (0, 1) => MotionIntent::Left,
            (0, _) => MotionIntent::Right,
            (1, 1) => MotionIntent::ForwardLeft,
            (1, _) => MotionIntent::ForwardRight,
            (_, 1) => MotionIntent::BackwardLeft,
            (_, _) => MotionIntent::BackwardRight
        }
    }
}

impl AxisInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the input wasn't already held.
    pub fn press(&mut self, dir: AxisDir) -> bool {
        if self.held.contains(&dir) {
            return false
        }
        self.held.push(dir);
        true
    }

    /// Returns `true` if the input was held.
    pub fn release(&mut self, dir: AxisDir) -> bool {
        match self.held.iter().position(|&d| d == dir) {
            Some(i) => {
                self.held.remove(i);
                true
            },
            None => false
        }
    }

    pub fn resolve(&self) -> AxisIntent {
        match axis_sign(
            self.held.contains(&AxisDir::Up), 
            self.held.contains(&AxisDir::Down)
        ) {
            1 => AxisIntent::Up,
            -1 => AxisIntent::Down,
            _ => AxisIntent::Hold
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// +1 if only the positive input is held, -1 if only the negative, 0 otherwise.
fn axis_sign(positive: bool, negative: bool) -> i8 {
    match (positive, negative) {
        (true, false) => 1,
        (false, true) => -1,
        _ => 0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use Direction::*;

    /// Every subset of the four directions with the intent it must resolve to.
    fn table() -> Vec<(Vec<Direction>, MotionIntent)> {
        vec![
            (vec![], MotionIntent::Stop),
            (vec![Front], MotionIntent::Forward),
            (vec![Back], MotionIntent::Backward),
            (vec![Left], MotionIntent::Left),
            (vec![Right], MotionIntent::Right),
            (vec![Front, Left], MotionIntent::ForwardLeft),
            (vec![Front, Right], MotionIntent::ForwardRight),
            (vec![Back, Left], MotionIntent::BackwardLeft),
            (vec![Back, Right], MotionIntent::BackwardRight),
            (vec![Front, Back], MotionIntent::Stop),
            (vec![Left, Right], MotionIntent::Stop),
            (vec![Front, Back, Left], MotionIntent::Left),
            (vec![Front, Back, Right], MotionIntent::Right),
            (vec![Front, Left, Right], MotionIntent::Forward),
            (vec![Back, Left, Right], MotionIntent::Backward),
            (vec![Front, Back, Left, Right], MotionIntent::Stop),
        ]
    }

    #[test]
    fn test_resolve_ignores_press_order() {
        for (dirs, expected) in table() {
            // Forwards and reversed press order must agree
            let mut fwd = DirectionStack::new();
            let mut rev = DirectionStack::new();
            for d in dirs.iter() {
                fwd.press(*d);
            }
            for d in dirs.iter().rev() {
                rev.press(*d);
            }

            assert_eq!(fwd.resolve(), expected, "pressed {:?}", dirs);
            assert_eq!(rev.resolve(), expected, "pressed {:?} reversed", dirs);
        }
    }

    #[test]
    fn test_press_is_idempotent() {
        let mut stack = DirectionStack::new();
        assert!(stack.press(Front));
        assert!(!stack.press(Front));
        assert_eq!(stack.held(), &[Front]);

        // One release is enough to clear a double press
        assert!(stack.release(Front));
        assert_eq!(stack.resolve(), MotionIntent::Stop);
    }

    #[test]
    fn test_release_unheld_is_noop() {
        let mut stack = DirectionStack::new();
        stack.press(Left);

        assert!(!stack.release(Right));
        assert!(!stack.release(Front));
        assert_eq!(stack.held(), &[Left]);
        assert_eq!(stack.resolve(), MotionIntent::Left);

        stack.release(Left);
        assert!(!stack.release(Left));
        assert!(stack.held().is_empty());
    }

    #[test]
    fn test_held_keeps_press_order() {
        let mut stack = DirectionStack::new();
        stack.press(Right);
        stack.press(Back);
        stack.press(Front);
        stack.release(Back);
        assert_eq!(stack.held(), &[Right, Front]);
        assert_eq!(stack.resolve(), MotionIntent::ForwardRight);

        stack.clear();
        assert_eq!(stack.resolve(), MotionIntent::Stop);
    }

    #[test]
    fn test_axis_input() {
        let mut head = AxisInput::new();
        assert_eq!(head.resolve(), AxisIntent::Hold);

        head.press(AxisDir::Up);
        assert_eq!(head.resolve(), AxisIntent::Up);

        head.press(AxisDir::Down);
        assert_eq!(head.resolve(), AxisIntent::Hold);

        head.release(AxisDir::Up);
        assert_eq!(head.resolve(), AxisIntent::Down);

        assert!(!head.release(AxisDir::Up));
        assert!(head.release(AxisDir::Down));
        assert_eq!(head.resolve(), AxisIntent::Hold);
    }
}
