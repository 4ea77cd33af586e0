//! Command dispatch module
//!
//! Releases operator intents to the actuators once the configured delay has
//! elapsed. Movement, head and lift are independent instances of the same
//! machine:
//!
//! ```text
//!     Idle --intent change--> Armed --deadline--> Idle
//!                              |  ^
//!                              +--+ intent change (timer restarted)
//! ```
//!
//! When a timer fires the category's *current* intent is submitted, not the
//! one which armed the timer, so only the most recent command is ever
//! realised.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod params;
mod state;
mod timer;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// Internal
pub use params::*;
pub use state::*;
pub use timer::*;

use crate::direction::{AxisIntent, MotionIntent};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Independent command categories, each has its own pending command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Movement,
    Head,
    Lift
}

/// An intent for one of the command categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Intent {
    Movement(MotionIntent),
    Head(AxisIntent),
    Lift(AxisIntent)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Category {
    /// All categories, in the order their timers are checked.
    pub const ALL: [Category; 3] = [Category::Movement, Category::Head, Category::Lift];

    pub(crate) fn index(self) -> usize {
        match self {
            Category::Movement => 0,
            Category::Head => 1,
            Category::Lift => 2
        }
    }
}

impl Intent {
    pub fn category(&self) -> Category {
        match self {
            Intent::Movement(_) => Category::Movement,
            Intent::Head(_) => Category::Head,
            Intent::Lift(_) => Category::Lift
        }
    }

    /// True if the intent leaves its actuators at rest.
    pub fn is_at_rest(&self) -> bool {
        match self {
            Intent::Movement(m) => *m == MotionIntent::Stop,
            Intent::Head(a) | Intent::Lift(a) => *a == AxisIntent::Hold
        }
    }
}
