//! # Actuator Equipment Interface
//!
//! The robot's drivetrain, head and lift are reached through an [`ActuatorSink`]. The driver
//! behind the sink may be executing an action of its own (an animation for example), in which
//! case it reports [`ActuatorError::Busy`] rather than queueing the command.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Primitive operations accepted by the robot's actuator driver.
pub trait ActuatorSink: Send {
    /// Drive the left and right wheels at the given speeds.
    ///
    /// Units: millimeters/second
    fn set_wheel_velocities(&mut self, left_mms: f64, right_mms: f64) -> Result<(), ActuatorError>;

    /// Move the head at the given angular velocity, positive is upwards.
    ///
    /// Units: radians/second
    fn set_head_velocity(&mut self, rate_rads: f64) -> Result<(), ActuatorError>;

    /// Move the lift at the given angular velocity, positive is upwards.
    ///
    /// Units: radians/second
    fn set_lift_velocity(&mut self, rate_rads: f64) -> Result<(), ActuatorError>;

    /// Stop all motors.
    fn stop_all(&mut self) -> Result<(), ActuatorError>;

    /// Start the robot's autonomous idle animation.
    fn start_idle_behavior(&mut self) -> Result<(), ActuatorError>;

    /// Stop the robot's autonomous idle animation.
    fn stop_idle_behavior(&mut self) -> Result<(), ActuatorError>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors reported by an [`ActuatorSink`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ActuatorError {
    /// The device is executing a conflicting action, the command was not accepted.
    #[error("The actuator is busy executing another action")]
    Busy,

    /// Any other failure of the driver.
    #[error("Actuator fault: {0}")]
    Fault(String),
}

/// A single primitive command for an [`ActuatorSink`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActuatorCmd {
    /// Wheel speeds in millimeters/second.
    Wheels { left_mms: f64, right_mms: f64 },

    /// Head angular velocity in radians/second.
    Head(f64),

    /// Lift angular velocity in radians/second.
    Lift(f64),

    StopAll,
    StartIdle,
    StopIdle,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActuatorCmd {
    /// Submit this command to the given sink.
    pub fn apply(&self, sink: &mut dyn ActuatorSink) -> Result<(), ActuatorError> {
        match *self {
            ActuatorCmd::Wheels { left_mms, right_mms } => 
                sink.set_wheel_velocities(left_mms, right_mms),
            ActuatorCmd::Head(rate_rads) => sink.set_head_velocity(rate_rads),
            ActuatorCmd::Lift(rate_rads) => sink.set_lift_velocity(rate_rads),
            ActuatorCmd::StopAll => sink.stop_all(),
            ActuatorCmd::StartIdle => sink.start_idle_behavior(),
            ActuatorCmd::StopIdle => sink.stop_idle_behavior(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
        busy: bool
    }

    impl RecordingSink {
        fn record(&mut self, call: String) -> Result<(), ActuatorError> {
            if self.busy {
                return Err(ActuatorError::Busy)
            }
            self.calls.push(call);
            Ok(())
        }
    }

    impl ActuatorSink for RecordingSink {
        fn set_wheel_velocities(&mut self, l: f64, r: f64) -> Result<(), ActuatorError> {
            self.record(format!("wheels {} {}", l, r))
        }
        fn set_head_velocity(&mut self, v: f64) -> Result<(), ActuatorError> {
            self.record(format!("head {}", v))
        }
        fn set_lift_velocity(&mut self, v: f64) -> Result<(), ActuatorError> {
            self.record(format!("lift {}", v))
        }
        fn stop_all(&mut self) -> Result<(), ActuatorError> {
            self.record("stop".into())
        }
        fn start_idle_behavior(&mut self) -> Result<(), ActuatorError> {
            self.record("start idle".into())
        }
        fn stop_idle_behavior(&mut self) -> Result<(), ActuatorError> {
            self.record("stop idle".into())
        }
    }

    #[test]
    fn test_apply_routes_each_command() {
        let mut sink = RecordingSink::default();

        let cmds = [
            ActuatorCmd::Wheels { left_mms: 100.0, right_mms: -100.0 },
            ActuatorCmd::Head(0.3),
            ActuatorCmd::Lift(-1.0),
            ActuatorCmd::StopAll,
            ActuatorCmd::StartIdle,
            ActuatorCmd::StopIdle,
        ];
        for c in cmds.iter() {
            c.apply(&mut sink).unwrap();
        }

        assert_eq!(sink.calls, vec![
            "wheels 100 -100", "head 0.3", "lift -1", "stop", "start idle", "stop idle"
        ]);
    }

    #[test]
    fn test_apply_forwards_busy() {
        let mut sink = RecordingSink { busy: true, ..Default::default() };
        assert_eq!(ActuatorCmd::StopAll.apply(&mut sink), Err(ActuatorError::Busy));
        assert!(sink.calls.is_empty());
    }
}
