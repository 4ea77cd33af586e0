//! # Idle behaviour controller
//!
//! Starts the robot's autonomous idle animation once the operator has been
//! quiet for long enough, and stops it the moment the operator does anything.
//! Operator activity always wins over the animation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use teleop_if::eqpt::{ActuatorCmd, ActuatorSink};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the idle behaviour controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdleParams {
    /// Time without operator activity before the idle animation starts.
    ///
    /// Units: milliseconds
    pub quiet_threshold_ms: u64,
}

#[derive(Debug)]
pub struct IdleCtrl {
    quiet_threshold: Duration,

    /// Instant of the last operator activity or dispatched command
    last_activity: Instant,

    /// When the idle animation may next start, `None` once the deadline has
    /// been consumed.
    deadline: Option<Instant>,

    state: IdleState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdleState {
    /// The operator is in control
    Active,

    /// The idle animation is running
    Animating
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for IdleParams {
    fn default() -> Self {
        Self {
            quiet_threshold_ms: 3000
        }
    }
}

impl IdleCtrl {
    /// Create a new controller, counting the quiet period from `now`.
    pub fn new(params: &IdleParams, now: Instant) -> Self {
        let quiet_threshold = Duration::from_millis(params.quiet_threshold_ms);
        Self {
            quiet_threshold,
            last_activity: now,
            deadline: now.checked_add(quiet_threshold),
            state: IdleState::Active
        }
    }

    /// Record operator activity.
    ///
    /// Resets the idle clock and stops the animation if it's running. Returns
    /// true if the animation was stopped.
    pub fn note_activity(&mut self, now: Instant, sink: &mut dyn ActuatorSink) -> bool {
        self.last_activity = now;
        self.deadline = now.checked_add(self.quiet_threshold);

        if self.state == IdleState::Animating {
            self.stop(sink);
            true
        }
        else {
            false
        }
    }

    /// Start the idle animation once strictly more than the quiet period has
    /// elapsed since the last activity.
    ///
    /// `quiescent` must only be true if the robot isn't paused and no
    /// operator command is pending or being executed. The deadline is
    /// consumed whether or not the animation starts, the next activity
    /// re-arms it. Returns true if the animation was started.
    pub fn maybe_start_idle(
        &mut self, 
        now: Instant, 
        quiescent: bool, 
        sink: &mut dyn ActuatorSink
    ) -> bool {
        let due = match self.deadline {
            Some(d) => now > d,
            None => false
        };

        if !due || self.state == IdleState::Animating {
            return false
        }

        self.deadline = None;

        if !quiescent {
            debug!("Quiet period elapsed while commands are active, idle animation skipped");
            return false
        }

        info!(
            "No activity for {:.1} s, starting idle animation", 
            (now - self.last_activity).as_secs_f64()
        );
        if let Err(e) = ActuatorCmd::StartIdle.apply(sink) {
            warn!("Could not start the idle animation: {}", e);
        }
        self.state = IdleState::Animating;

        true
    }

    /// Stop the animation and disarm the deadline, used when pausing.
    pub fn suspend(&mut self, sink: &mut dyn ActuatorSink) {
        self.deadline = None;
        if self.state == IdleState::Animating {
            self.stop(sink);
        }
    }

    /// When the idle animation may next start.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            IdleState::Active => self.deadline,
            IdleState::Animating => None
        }
    }

    pub fn state(&self) -> IdleState {
        self.state
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    fn stop(&mut self, sink: &mut dyn ActuatorSink) {
        info!("Operator activity, stopping idle animation");
        if let Err(e) = ActuatorCmd::StopIdle.apply(sink) {
            warn!("Could not stop the idle animation: {}", e);
        }
        self.state = IdleState::Active;
    }
}
