//! Implementations for the Dispatcher state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info, warn};
use serde::Serialize;
use std::time::{Duration, Instant};
use teleop_if::eqpt::{ActuatorError, ActuatorSink};

// Internal
use super::{
    Category, CommandTimer, DispatchParams, DriveParams, Intent, PendingCommand, StopRelease
};
use crate::direction::MotionIntent;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command dispatcher state.
///
/// The dispatcher doesn't hold the operator's intents itself, when a timer
/// fires the owner supplies the category's current intent to
/// [`Dispatcher::release`].
#[derive(Debug)]
pub struct Dispatcher {
    drive: DriveParams,
    stop_release: StopRelease,

    timers: [CommandTimer; 3],
    next_id: u64,

    report: DispatchReport,
}

/// Counters on the dispatcher's activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    /// Commands accepted by the actuators
    pub submitted: u64,

    /// Pending commands replaced by a newer intent before firing
    pub superseded: u64,

    /// Commands dropped because the actuators were busy
    pub dropped_busy: u64,

    /// Commands dropped because of an actuator fault
    pub dropped_fault: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// What happened to an intent change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatched {
    /// A timer was armed for the intent.
    Armed(PendingCommand),

    /// The intent was submitted straight away.
    Released(Submission),
}

/// Result of submitting a command to the actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    DroppedBusy,
    DroppedFault,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Dispatcher {
    pub fn new(drive: DriveParams, params: &DispatchParams) -> Self {
        Self {
            drive,
            stop_release: params.stop_release,
            timers: Default::default(),
            next_id: 0,
            report: DispatchReport::default()
        }
    }

    /// Handle a change of intent for the intent's category.
    ///
    /// Any command already pending for the category is cancelled and a new
    /// timer is armed for `delay`. A zero delay, or a stop under
    /// [`StopRelease::Immediate`], is submitted at once instead.
    pub fn intent_changed(
        &mut self,
        intent: Intent,
        delay: Duration,
        now: Instant,
        sink: &mut dyn ActuatorSink
    ) -> Dispatched {
        let category = intent.category();
        let id = self.next_id();

        let immediate_stop = self.stop_release == StopRelease::Immediate
            && intent == Intent::Movement(MotionIntent::Stop);

        if delay == Duration::from_secs(0) || immediate_stop {
            if let Some(old) = self.timers[category.index()].cancel() {
                self.superseded(&old, id);
            }
            return Dispatched::Released(self.submit(category, id, intent, sink))
        }

        let fire_at = match now.checked_add(delay) {
            Some(t) => t,
            None => {
                error!(
                    "{:?} command #{} ({:?}) dropped, a delay of {:?} is out of range",
                    category, id, intent, delay
                );
                if let Some(old) = self.timers[category.index()].cancel() {
                    self.superseded(&old, id);
                }
                self.report.dropped_fault += 1;
                return Dispatched::Released(Submission::DroppedFault)
            }
        };

        let cmd = PendingCommand {
            id,
            intent,
            armed_at: now,
            fire_at
        };

        if let Some(old) = self.timers[category.index()].arm(cmd) {
            self.superseded(&old, id);
        }

        debug!(
            "{:?} command #{} ({:?}) armed, fires in {:.2} s",
            category, id, intent, delay.as_secs_f64()
        );

        Dispatched::Armed(cmd)
    }

    /// Disarm and return every pending command whose fire time has been
    /// reached.
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingCommand> {
        self.timers.iter_mut()
            .filter_map(|t| t.take_due(now))
            .collect()
    }

    /// Release a command whose timer has fired, submitting the category's
    /// current intent.
    pub fn release(
        &mut self,
        fired: &PendingCommand,
        current: Intent,
        sink: &mut dyn ActuatorSink
    ) -> Submission {
        let category = fired.intent.category();

        if current != fired.intent {
            debug!(
                "{:?} command #{} was armed as {:?}, releasing current intent {:?}",
                category, fired.id, fired.intent, current
            );
        }

        self.submit(category, fired.id, current, sink)
    }

    /// Cancel every pending command, returning how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let mut num_cancelled = 0;
        for timer in self.timers.iter_mut() {
            if let Some(p) = timer.cancel() {
                debug!("{:?} command #{} cancelled", p.intent.category(), p.id);
                num_cancelled += 1;
            }
        }
        num_cancelled
    }

    /// Earliest fire time of any pending command.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().filter_map(|t| t.deadline()).min()
    }

    pub fn is_armed(&self, category: Category) -> bool {
        self.timers[category.index()].is_armed()
    }

    pub fn any_armed(&self) -> bool {
        self.timers.iter().any(|t| t.is_armed())
    }

    pub fn report(&self) -> DispatchReport {
        self.report
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn superseded(&mut self, old: &PendingCommand, new_id: u64) {
        debug!(
            "{:?} command #{} ({:?}) superseded by #{}",
            old.intent.category(), old.id, old.intent, new_id
        );
        self.report.superseded += 1;
    }

    /// Submit an intent to the actuators.
    ///
    /// Rejected commands are dropped, a fresher command always follows so
    /// retrying a stale one is pointless.
    fn submit(
        &mut self,
        category: Category,
        id: u64,
        intent: Intent,
        sink: &mut dyn ActuatorSink
    ) -> Submission {
        let cmd = self.drive.command_for(intent);

        match cmd.apply(sink) {
            Ok(()) => {
                info!("{:?} command #{} released: {:?} -> {:?}", category, id, intent, cmd);
                self.report.submitted += 1;
                Submission::Accepted
            },
            Err(ActuatorError::Busy) => {
                warn!("Actuators busy, {:?} command #{} ({:?}) dropped", category, id, intent);
                self.report.dropped_busy += 1;
                Submission::DroppedBusy
            },
            Err(e) => {
                error!("{:?} command #{} ({:?}) dropped: {}", category, id, intent, e);
                self.report.dropped_fault += 1;
                Submission::DroppedFault
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::direction::AxisIntent;
    use crate::sim::SimActuator;
    use teleop_if::eqpt::ActuatorCmd;

    const FORWARD: Intent = Intent::Movement(MotionIntent::Forward);
    const LEFT: Intent = Intent::Movement(MotionIntent::Left);

    fn dispatcher(stop_release: StopRelease) -> Dispatcher {
        Dispatcher::new(DriveParams::default(), &DispatchParams { stop_release })
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_latest_intent_wins() {
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        let record = act.record();
        let t0 = Instant::now();

        // A at t=0, B replaces it at t=1.0
        d.intent_changed(FORWARD, secs(2.5), t0, &mut act);
        d.intent_changed(LEFT, secs(2.5), t0 + secs(1.0), &mut act);
        assert_eq!(d.report().superseded, 1);
        assert_eq!(d.next_deadline(), Some(t0 + secs(3.5)));

        // A's fire time passes without anything being released
        assert!(d.take_due(t0 + secs(2.5)).is_empty());
        assert!(d.take_due(t0 + secs(3.49)).is_empty());

        let due = d.take_due(t0 + secs(3.5));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].intent, LEFT);
        assert_eq!(d.release(&due[0], LEFT, &mut act), Submission::Accepted);

        assert_eq!(record.accepted(), vec![
            ActuatorCmd::Wheels { left_mms: -100.0, right_mms: 100.0 }
        ]);
        assert!(!d.any_armed());
    }

    #[test]
    fn test_release_uses_current_intent() {
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        let record = act.record();
        let t0 = Instant::now();

        d.intent_changed(FORWARD, secs(1.0), t0, &mut act);
        let due = d.take_due(t0 + secs(1.0));
        d.release(&due[0], Intent::Movement(MotionIntent::Stop), &mut act);

        assert_eq!(record.accepted(), vec![
            ActuatorCmd::Wheels { left_mms: 0.0, right_mms: 0.0 }
        ]);
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        let record = act.record();
        let t0 = Instant::now();

        assert_eq!(
            d.intent_changed(FORWARD, Duration::from_secs(0), t0, &mut act),
            Dispatched::Released(Submission::Accepted)
        );
        assert!(!d.any_armed());
        assert_eq!(record.accepted().len(), 1);
    }

    #[test]
    fn test_categories_are_independent() {
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        let t0 = Instant::now();

        d.intent_changed(FORWARD, secs(2.0), t0, &mut act);
        d.intent_changed(Intent::Head(AxisIntent::Up), secs(1.0), t0, &mut act);
        assert!(d.is_armed(Category::Movement));
        assert!(d.is_armed(Category::Head));
        assert!(!d.is_armed(Category::Lift));
        assert_eq!(d.report().superseded, 0);
        assert_eq!(d.next_deadline(), Some(t0 + secs(1.0)));

        let due = d.take_due(t0 + secs(1.0));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].intent.category(), Category::Head);
        assert!(d.is_armed(Category::Movement));
    }

    #[test]
    fn test_stop_release_policy() {
        let stop = Intent::Movement(MotionIntent::Stop);
        let t0 = Instant::now();

        // Delayed: the stop waits like any other command
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        d.intent_changed(FORWARD, secs(1.0), t0, &mut act);
        assert!(matches!(
            d.intent_changed(stop, secs(1.0), t0, &mut act), 
            Dispatched::Armed(_)
        ));
        assert!(act.record().accepted().is_empty());

        // Immediate: the stop cancels the pending forward and goes at once
        let mut d = dispatcher(StopRelease::Immediate);
        let mut act = SimActuator::new();
        d.intent_changed(FORWARD, secs(1.0), t0, &mut act);
        assert_eq!(
            d.intent_changed(stop, secs(1.0), t0, &mut act),
            Dispatched::Released(Submission::Accepted)
        );
        assert!(!d.any_armed());
        assert_eq!(d.report().superseded, 1);
        assert_eq!(act.record().accepted(), vec![
            ActuatorCmd::Wheels { left_mms: 0.0, right_mms: 0.0 }
        ]);
    }

    #[test]
    fn test_busy_is_dropped() {
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        let record = act.record();
        let t0 = Instant::now();

        record.set_busy_for(1);
        d.intent_changed(FORWARD, secs(1.0), t0, &mut act);
        let due = d.take_due(t0 + secs(1.0));
        assert_eq!(d.release(&due[0], FORWARD, &mut act), Submission::DroppedBusy);

        // Nothing is retried
        assert!(!d.any_armed());
        assert!(d.take_due(t0 + secs(10.0)).is_empty());
        assert!(record.accepted().is_empty());
        assert_eq!(d.report().dropped_busy, 1);
    }

    #[test]
    fn test_unreachable_fire_time_is_dropped() {
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        let record = act.record();
        let t0 = Instant::now();

        d.intent_changed(FORWARD, secs(1.0), t0, &mut act);
        assert_eq!(
            d.intent_changed(LEFT, Duration::MAX, t0, &mut act),
            Dispatched::Released(Submission::DroppedFault)
        );

        // The older command doesn't survive either
        assert!(!d.any_armed());
        assert!(record.accepted().is_empty());
        assert_eq!(d.report().dropped_fault, 1);
        assert_eq!(d.report().superseded, 1);
    }

    #[test]
    fn test_cancel_all() {
        let mut d = dispatcher(StopRelease::Delayed);
        let mut act = SimActuator::new();
        let t0 = Instant::now();

        d.intent_changed(FORWARD, secs(1.0), t0, &mut act);
        d.intent_changed(Intent::Lift(AxisIntent::Down), secs(1.0), t0, &mut act);
        assert_eq!(d.cancel_all(), 2);
        assert_eq!(d.next_deadline(), None);
        assert!(d.take_due(t0 + secs(5.0)).is_empty());
    }
}
