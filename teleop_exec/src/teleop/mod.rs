//! # Teleoperation control
//!
//! All command state (held directions, pause flag, delay policy, pending
//! commands and the idle clock) lives in a single [`TeleopCore`] owned by the
//! control thread. The UI talks to it through a cloneable [`TeleopHandle`]
//! which forwards every call over a channel, so nothing the operator does
//! ever blocks on the robot.
//!
//! The control thread sleeps until either a signal arrives or the nearest
//! deadline (a pending command or the idle animation) is reached. Signals
//! queued on a wake are all handled before any due timer fires, so operator
//! input wins a tie with a timer.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod control;
mod handle;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

pub use self::control::*;
pub use self::handle::*;

use crate::{
    delay::{DelayError, DelayStatus},
    direction::Direction,
    dispatch::DispatchReport,
    idle::IdleState,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Snapshot of the controller, for the operator's display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeleopStatus {
    pub paused: bool,
    pub delay: DelayStatus,

    /// True if nothing is pending and the robot is at rest
    pub quiescent: bool,

    pub idle: IdleState,

    /// Directions held by the operator, in press order
    pub held: Vec<Direction>,

    pub report: DispatchReport,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TeleopError {
    #[error("The control thread is no longer running")]
    ControlThreadGone,

    #[error(transparent)]
    Delay(#[from] DelayError),

    #[error("Could not start the control thread: {0}")]
    SpawnFailed(std::io::Error),
}
