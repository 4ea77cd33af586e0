//! # Simulated actuator driver

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use std::sync::{Arc, Mutex, MutexGuard};
use teleop_if::eqpt::{ActuatorCmd, ActuatorError, ActuatorSink};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An actuator sink which logs and records every command it accepts.
///
/// The sink can be told to report busy for a number of calls to emulate a
/// robot that is executing an action of its own.
pub struct SimActuator {
    record: ActuatorRecord
}

/// Shared view of what a [`SimActuator`] has been asked to do.
#[derive(Clone, Default)]
pub struct ActuatorRecord {
    inner: Arc<Mutex<RecordInner>>
}

#[derive(Default)]
struct RecordInner {
    accepted: Vec<ActuatorCmd>,
    rejected: Vec<ActuatorCmd>,
    busy_for: usize,
    idle_running: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimActuator {
    pub fn new() -> Self {
        Self {
            record: ActuatorRecord::default()
        }
    }

    /// Get a handle on the record of commands, it stays valid once the sink
    /// has been moved into the controller.
    pub fn record(&self) -> ActuatorRecord {
        self.record.clone()
    }

    fn actuate(&mut self, cmd: ActuatorCmd) -> Result<(), ActuatorError> {
        let mut inner = self.record.lock();

        if inner.busy_for > 0 {
            inner.busy_for -= 1;
            inner.rejected.push(cmd);
            return Err(ActuatorError::Busy)
        }

        match cmd {
            ActuatorCmd::StartIdle => inner.idle_running = true,
            ActuatorCmd::StopIdle => inner.idle_running = false,
            _ => ()
        }

        info!("Actuating {:?}", cmd);
        inner.accepted.push(cmd);

        Ok(())
    }
}

impl Default for SimActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorSink for SimActuator {
    fn set_wheel_velocities(&mut self, left_mms: f64, right_mms: f64) -> Result<(), ActuatorError> {
        self.actuate(ActuatorCmd::Wheels { left_mms, right_mms })
    }

    fn set_head_velocity(&mut self, rate_rads: f64) -> Result<(), ActuatorError> {
        self.actuate(ActuatorCmd::Head(rate_rads))
    }

    fn set_lift_velocity(&mut self, rate_rads: f64) -> Result<(), ActuatorError> {
        self.actuate(ActuatorCmd::Lift(rate_rads))
    }

    fn stop_all(&mut self) -> Result<(), ActuatorError> {
        self.actuate(ActuatorCmd::StopAll)
    }

    fn start_idle_behavior(&mut self) -> Result<(), ActuatorError> {
        self.actuate(ActuatorCmd::StartIdle)
    }

    fn stop_idle_behavior(&mut self) -> Result<(), ActuatorError> {
        self.actuate(ActuatorCmd::StopIdle)
    }
}

impl ActuatorRecord {
    /// Commands accepted so far, in order.
    pub fn accepted(&self) -> Vec<ActuatorCmd> {
        self.lock().accepted.clone()
    }

    /// Commands rejected as busy so far, in order.
    pub fn rejected(&self) -> Vec<ActuatorCmd> {
        self.lock().rejected.clone()
    }

    /// Forget all recorded commands.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.accepted.clear();
        inner.rejected.clear();
    }

    /// Report busy for the next `num_calls` commands.
    pub fn set_busy_for(&self, num_calls: usize) {
        self.lock().busy_for = num_calls;
    }

    /// True if the idle animation has been started and not stopped.
    pub fn idle_running(&self) -> bool {
        self.lock().idle_running
    }

    /// A poisoned lock only means a test panicked while holding it, the
    /// record is still readable.
    fn lock(&self) -> MutexGuard<'_, RecordInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_records_commands() {
        let mut act = SimActuator::new();
        let record = act.record();

        act.set_wheel_velocities(1.0, 2.0).unwrap();
        act.start_idle_behavior().unwrap();
        assert!(record.idle_running());
        act.stop_idle_behavior().unwrap();
        assert!(!record.idle_running());

        assert_eq!(record.accepted(), vec![
            ActuatorCmd::Wheels { left_mms: 1.0, right_mms: 2.0 },
            ActuatorCmd::StartIdle,
            ActuatorCmd::StopIdle,
        ]);
    }

    #[test]
    fn test_busy() {
        let mut act = SimActuator::new();
        let record = act.record();
        record.set_busy_for(1);

        assert_eq!(act.stop_all(), Err(ActuatorError::Busy));
        assert_eq!(act.stop_all(), Ok(()));

        assert_eq!(record.rejected(), vec![ActuatorCmd::StopAll]);
        assert_eq!(record.accepted(), vec![ActuatorCmd::StopAll]);

        record.clear();
        assert!(record.accepted().is_empty());
    }
}
