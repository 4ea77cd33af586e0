//! Conversion of intents into actuator commands

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use teleop_if::eqpt::ActuatorCmd;

use super::{DriveParams, Intent};
use crate::direction::{AxisIntent, MotionIntent};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveParams {
    /// Get the actuator command which realises the given intent.
    pub fn command_for(&self, intent: Intent) -> ActuatorCmd {
        match intent {
            Intent::Movement(m) => self.wheels_for(m),
            Intent::Head(a) => ActuatorCmd::Head(axis_rate(a, self.head_speed_rads)),
            Intent::Lift(a) => ActuatorCmd::Lift(axis_rate(a, self.lift_speed_rads)),
        }
    }

    /// Wheel speeds for a motion.
    ///
    /// Turning while driving speeds up the outer wheel by the turn factor,
    /// turning on the spot drives the wheels in opposite directions.
    fn wheels_for(&self, motion: MotionIntent) -> ActuatorCmd {
        let s = self.speed_mms;
        let f = self.turn_factor;

        let (left_mms, right_mms) = match motion {
            MotionIntent::Stop => (0.0, 0.0),
            MotionIntent::Forward => (s, s),
            MotionIntent::Backward => (-s, -s),
            MotionIntent::Left => (-s, s),
            MotionIntent::Right => (s, -s),
            MotionIntent::ForwardLeft => (s, s * f),
            MotionIntent::ForwardRight => (s * f, s),
            MotionIntent::BackwardLeft => (-s, -s * f),
            MotionIntent::BackwardRight => (-s * f, -s),
        };

        ActuatorCmd::Wheels { left_mms, right_mms }
    }
}

fn axis_rate(intent: AxisIntent, speed_rads: f64) -> f64 {
    match intent {
        AxisIntent::Up => speed_rads,
        AxisIntent::Down => -speed_rads,
        AxisIntent::Hold => 0.0
    }
}
