//! Control state and the deterministic core of the control thread

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error, info};
use std::time::Instant;
use teleop_if::{
    eqpt::{ActuatorCmd, ActuatorSink},
    input::KeyEvent,
};

use super::{TeleopError, TeleopStatus};
use crate::{
    delay::{DelayError, DelayPolicy, DelayStatus},
    direction::{AxisInput, DirectionStack},
    dispatch::{Category, Dispatcher, Intent},
    idle::IdleCtrl,
    input::{Edge, KeyMap, OperatorInput},
    params::TeleopParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Everything the operator has told the robot to do.
#[derive(Debug)]
pub struct ControlState {
    pub directions: DirectionStack,
    pub head: AxisInput,
    pub lift: AxisInput,
    pub paused: bool,
    pub delay: DelayPolicy,
}

/// The control thread's state and logic, driven with explicit instants.
pub struct TeleopCore {
    state: ControlState,
    keys: KeyMap,
    dispatcher: Dispatcher,
    idle: IdleCtrl,
    sink: Box<dyn ActuatorSink>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControlState {
    pub fn new(delay: DelayPolicy) -> Self {
        Self {
            directions: DirectionStack::new(),
            head: AxisInput::new(),
            lift: AxisInput::new(),
            paused: false,
            delay
        }
    }

    /// The resolved intent for a category.
    pub fn intent(&self, category: Category) -> Intent {
        match category {
            Category::Movement => Intent::Movement(self.directions.resolve()),
            Category::Head => Intent::Head(self.head.resolve()),
            Category::Lift => Intent::Lift(self.lift.resolve()),
        }
    }

    /// True if every category resolves to its rest intent.
    pub fn is_at_rest(&self) -> bool {
        Category::ALL.iter().all(|c| self.intent(*c).is_at_rest())
    }
}

impl TeleopCore {
    /// Build the core, the idle clock starts counting from `now`.
    pub fn new(
        params: &TeleopParams,
        sink: Box<dyn ActuatorSink>,
        now: Instant
    ) -> Result<Self, TeleopError> {
        let delay = DelayPolicy::new(&params.delay)?;

        Ok(Self {
            state: ControlState::new(delay),
            keys: KeyMap::new(&params.keys),
            dispatcher: Dispatcher::new(params.drive.clone(), &params.dispatch),
            idle: IdleCtrl::new(&params.idle, now),
            sink
        })
    }

    /// Handle a raw key event, returning the input it translated to.
    pub fn on_key(&mut self, event: &KeyEvent, now: Instant) -> Option<OperatorInput> {
        let input = self.keys.translate(event);

        match input {
            Some(i) => self.on_input(i, now),
            None => debug!("Key event {:?} ignored", event)
        }

        input
    }

    /// Handle an operator input.
    pub fn on_input(&mut self, input: OperatorInput, now: Instant) {
        if let OperatorInput::TogglePause = input {
            self.toggle_pause(now);
            return
        }

        self.idle.note_activity(now, self.sink.as_mut());

        let (category, changed) = match input {
            OperatorInput::Drive(d, Edge::Press) =>
                (Category::Movement, self.state.directions.press(d)),
            OperatorInput::Drive(d, Edge::Release) =>
                (Category::Movement, self.state.directions.release(d)),
            OperatorInput::Head(a, Edge::Press) => (Category::Head, self.state.head.press(a)),
            OperatorInput::Head(a, Edge::Release) => (Category::Head, self.state.head.release(a)),
            OperatorInput::Lift(a, Edge::Press) => (Category::Lift, self.state.lift.press(a)),
            OperatorInput::Lift(a, Edge::Release) => (Category::Lift, self.state.lift.release(a)),
            OperatorInput::TogglePause => return
        };

        if changed {
            self.intent_changed(category, now);
        }
    }

    /// Select a delay profile by name.
    pub fn set_delay_profile(&mut self, name: &str) -> Result<DelayStatus, DelayError> {
        self.state.delay.select(name)?;
        Ok(self.state.delay.status())
    }

    /// Set the manual delay, only possible while the manual profile is active.
    pub fn set_manual_delay(&mut self, delay_s: f64) -> Result<DelayStatus, DelayError> {
        self.state.delay.set_manual_delay(delay_s)?;
        Ok(self.state.delay.status())
    }

    /// Pause the robot.
    ///
    /// Every pending command is cancelled and the robot is stopped straight
    /// away. Pausing while already paused sends the stop again.
    pub fn pause(&mut self, _now: Instant) {
        let num_cancelled = self.dispatcher.cancel_all();
        self.idle.suspend(self.sink.as_mut());

        if let Err(e) = ActuatorCmd::StopAll.apply(self.sink.as_mut()) {
            error!("Could not stop the robot on pause: {}", e);
        }

        self.state.paused = true;
        info!("Paused, {} pending command(s) cancelled", num_cancelled);
    }

    /// Resume after a pause, re-issuing the current intents with the
    /// configured delay. Returns false if not paused.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.state.paused {
            debug!("Resume requested while not paused");
            return false
        }

        self.state.paused = false;
        info!(
            "Resumed with a delay of {:.1} s, held directions: {:?}",
            self.state.delay.current_delay_s(),
            self.state.directions.held()
        );

        self.idle.note_activity(now, self.sink.as_mut());
        for category in Category::ALL.iter() {
            self.intent_changed(*category, now);
        }

        true
    }

    /// Toggle the pause state, returning the new state.
    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        if self.state.paused {
            self.resume(now);
        }
        else {
            self.pause(now);
        }
        self.state.paused
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn delay_status(&self) -> DelayStatus {
        self.state.delay.status()
    }

    pub fn control_state(&self) -> &ControlState {
        &self.state
    }

    /// The next instant at which [`TeleopCore::tick`] has something to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.dispatcher.next_deadline(), self.idle.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b)
        }
    }

    /// Fire every due timer. Returns the number of commands released.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.dispatcher.take_due(now);

        for pending in due.iter() {
            let current = self.state.intent(pending.intent.category());
            self.dispatcher.release(pending, current, self.sink.as_mut());
        }

        if !due.is_empty() {
            self.idle.note_activity(now, self.sink.as_mut());
        }

        let quiescent = self.is_quiescent();
        self.idle.maybe_start_idle(now, quiescent, self.sink.as_mut());

        due.len()
    }

    /// True if the robot isn't paused, no command is pending, and every
    /// category is at rest.
    pub fn is_quiescent(&self) -> bool {
        !self.state.paused && !self.dispatcher.any_armed() && self.state.is_at_rest()
    }

    pub fn status(&self) -> TeleopStatus {
        TeleopStatus {
            paused: self.state.paused,
            delay: self.state.delay.status(),
            quiescent: self.is_quiescent(),
            idle: self.idle.state(),
            held: self.state.directions.held().to_vec(),
            report: self.dispatcher.report()
        }
    }

    /// Cancel everything and leave the robot stopped.
    pub fn shutdown(&mut self) {
        self.dispatcher.cancel_all();
        self.idle.suspend(self.sink.as_mut());

        if let Err(e) = ActuatorCmd::StopAll.apply(self.sink.as_mut()) {
            error!("Could not stop the robot on shutdown: {}", e);
        }

        info!("Control stopped, dispatch report: {:?}", self.dispatcher.report());
    }

    fn intent_changed(&mut self, category: Category, now: Instant) {
        if self.state.paused {
            debug!("{:?} intent changed while paused, not dispatched", category);
            return
        }

        let intent = self.state.intent(category);
        let delay = self.state.delay.current_delay();
        self.dispatcher.intent_changed(intent, delay, now, self.sink.as_mut());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        direction::Direction,
        idle::{IdleParams, IdleState},
        sim::{ActuatorRecord, SimActuator},
    };
    use std::time::Duration;
    use teleop_if::input::Key;

    fn ms(m: u64) -> Duration {
        Duration::from_millis(m)
    }

    fn wheels(left_mms: f64, right_mms: f64) -> ActuatorCmd {
        ActuatorCmd::Wheels { left_mms, right_mms }
    }

    fn core_with(params: &TeleopParams, t0: Instant) -> (TeleopCore, ActuatorRecord) {
        let act = SimActuator::new();
        let record = act.record();
        (TeleopCore::new(params, Box::new(act), t0).unwrap(), record)
    }

    fn core(t0: Instant) -> (TeleopCore, ActuatorRecord) {
        core_with(&TeleopParams::default(), t0)
    }

    #[test]
    fn test_latest_wins_on_mars() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);
        core.set_delay_profile("Mars").unwrap();

        core.on_key(&KeyEvent::pressed(Key::Up), t0);
        core.tick(t0);
        core.on_key(&KeyEvent::pressed(Key::Left), t0 + ms(1000));
        core.tick(t0 + ms(1000));

        assert_eq!(core.next_deadline(), Some(t0 + ms(3500)));
        assert_eq!(core.tick(t0 + ms(2500)), 0);
        assert!(record.accepted().is_empty());

        assert_eq!(core.tick(t0 + ms(3500)), 1);
        assert_eq!(record.accepted(), vec![wheels(100.0, 200.0)]);
        assert_eq!(core.status().report.superseded, 1);
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        core.on_key(&KeyEvent::pressed(Key::Up), t0);
        assert_eq!(record.accepted(), vec![wheels(100.0, 100.0)]);

        core.on_key(&KeyEvent::pressed(Key::Char('z')), t0);
        core.on_key(&KeyEvent::released(Key::Up), t0);
        assert_eq!(
            record.accepted(),
            vec![wheels(100.0, 100.0), ActuatorCmd::Head(0.3), wheels(0.0, 0.0)]
        );

        // Only the idle deadline remains
        assert_eq!(core.next_deadline(), Some(t0 + ms(3000)));
    }

    #[test]
    fn test_pause_cancels_pending() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);
        core.set_delay_profile("Mars").unwrap();

        core.on_key(&KeyEvent::pressed(Key::Up), t0);
        core.pause(t0 + ms(1000));
        assert!(core.is_paused());
        assert_eq!(record.accepted(), vec![ActuatorCmd::StopAll]);
        assert_eq!(core.next_deadline(), None);

        core.tick(t0 + ms(5000));
        assert_eq!(record.accepted(), vec![ActuatorCmd::StopAll]);

        // Keys change the held set while paused but nothing is sent
        core.on_key(&KeyEvent::pressed(Key::Left), t0 + ms(5500));
        core.tick(t0 + ms(9000));
        assert_eq!(record.accepted(), vec![ActuatorCmd::StopAll]);

        // Resuming re-issues the current intents after the delay
        assert!(core.resume(t0 + ms(10_000)));
        assert_eq!(core.next_deadline(), Some(t0 + ms(12_500)));
        assert_eq!(core.tick(t0 + ms(12_500)), 3);
        assert_eq!(
            record.accepted(),
            vec![
                ActuatorCmd::StopAll,
                wheels(100.0, 200.0),
                ActuatorCmd::Head(0.0),
                ActuatorCmd::Lift(0.0)
            ]
        );
    }

    #[test]
    fn test_space_toggles_pause() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        assert_eq!(
            core.on_key(&KeyEvent::pressed(Key::Space), t0),
            Some(OperatorInput::TogglePause)
        );
        assert!(core.is_paused());
        assert_eq!(core.on_key(&KeyEvent::released(Key::Space), t0), None);
        assert!(core.is_paused());

        core.on_key(&KeyEvent::pressed(Key::Space), t0 + ms(100));
        assert!(!core.is_paused());
        assert!(!core.resume(t0 + ms(200)));

        // Zero delay so the resume is released straight away
        assert_eq!(
            record.accepted(),
            vec![
                ActuatorCmd::StopAll,
                wheels(0.0, 0.0),
                ActuatorCmd::Head(0.0),
                ActuatorCmd::Lift(0.0)
            ]
        );
    }

    #[test]
    fn test_idle_starts_once_and_activity_wins() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        core.tick(t0 + ms(2999));
        assert!(record.accepted().is_empty());

        core.tick(t0 + ms(3001));
        assert_eq!(record.accepted(), vec![ActuatorCmd::StartIdle]);
        assert_eq!(core.status().idle, IdleState::Animating);

        core.tick(t0 + ms(10_000));
        assert_eq!(record.accepted(), vec![ActuatorCmd::StartIdle]);

        core.on_key(&KeyEvent::pressed(Key::Up), t0 + ms(10_001));
        assert_eq!(
            record.accepted(),
            vec![ActuatorCmd::StartIdle, ActuatorCmd::StopIdle, wheels(100.0, 100.0)]
        );
        assert_eq!(core.status().idle, IdleState::Active);
    }

    #[test]
    fn test_key_within_1ms_of_idle_start() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        // Exactly at the threshold isn't long enough
        core.tick(t0 + ms(3000));
        assert!(record.accepted().is_empty());

        core.tick(t0 + ms(3001));
        core.on_key(&KeyEvent::pressed(Key::Char('z')), t0 + ms(3002));

        assert_eq!(
            record.accepted(),
            vec![ActuatorCmd::StartIdle, ActuatorCmd::StopIdle, ActuatorCmd::Head(0.3)]
        );
        assert!(!record.idle_running());
        assert_eq!(core.next_deadline(), Some(t0 + ms(6002)));
    }

    #[test]
    fn test_idle_waits_for_pending_commands() {
        let t0 = Instant::now();
        let params = TeleopParams {
            idle: IdleParams { quiet_threshold_ms: 1000 },
            ..Default::default()
        };
        let (mut core, record) = core_with(&params, t0);
        core.set_delay_profile("Mars").unwrap();

        // Quiet period elapses while the command is pending
        core.on_key(&KeyEvent::pressed(Key::Up), t0);
        core.tick(t0 + ms(1000));
        assert!(record.accepted().is_empty());

        // And while the robot is driving
        core.tick(t0 + ms(2500));
        core.tick(t0 + ms(3500));
        assert_eq!(record.accepted(), vec![wheels(100.0, 100.0)]);

        core.on_key(&KeyEvent::released(Key::Up), t0 + ms(4000));
        core.tick(t0 + ms(6500));
        assert!(core.is_quiescent());
        core.tick(t0 + ms(7501));
        assert_eq!(
            record.accepted(),
            vec![wheels(100.0, 100.0), wheels(0.0, 0.0), ActuatorCmd::StartIdle]
        );
    }

    #[test]
    fn test_no_idle_while_paused() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        core.pause(t0);
        core.on_key(&KeyEvent::pressed(Key::Up), t0 + ms(10));
        core.on_key(&KeyEvent::released(Key::Up), t0 + ms(20));
        core.tick(t0 + ms(60_000));

        assert_eq!(record.accepted(), vec![ActuatorCmd::StopAll]);
    }

    #[test]
    fn test_mars_then_manuel() {
        let t0 = Instant::now();
        let (mut core, _) = core(t0);

        let status = core.set_delay_profile("Mars").unwrap();
        assert_eq!(status.delay_s, 2.5);
        assert!(status.locked);
        assert_eq!(core.set_manual_delay(1.0), Err(DelayError::Locked("Mars".into())));

        let status = core.set_delay_profile("Manuel").unwrap();
        assert_eq!(status.profile, "Manual");
        assert_eq!(status.delay_s, 2.5);
        assert!(!status.locked);

        assert_eq!(core.set_manual_delay(1.24).unwrap().delay_s, 1.2);
        assert_eq!(core.set_manual_delay(-1.0), Err(DelayError::InvalidDelay(-1.0)));
        assert!(core.set_delay_profile("Jupiter").is_err());
        assert_eq!(core.delay_status().delay_s, 1.2);
    }

    #[test]
    fn test_out_of_range_delay_rejected() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        core.set_delay_profile("Manual").unwrap();
        core.set_manual_delay(0.5).unwrap();
        assert_eq!(core.set_manual_delay(1e20), Err(DelayError::InvalidDelay(1e20)));
        assert_eq!(core.set_manual_delay(1e19), Err(DelayError::InvalidDelay(1e19)));
        assert_eq!(core.delay_status().delay_s, 0.5);

        // Keys keep working with the previous delay
        core.on_key(&KeyEvent::pressed(Key::Up), t0);
        core.tick(t0 + ms(500));
        assert_eq!(record.accepted(), vec![wheels(100.0, 100.0)]);
    }

    #[test]
    fn test_auto_repeat_ignored() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        core.on_key(&KeyEvent::pressed(Key::Up), t0);
        for i in 1..10 {
            assert_eq!(core.on_key(&KeyEvent::pressed(Key::Up).repeated(), t0 + ms(30 * i)), None);
        }
        core.on_key(&KeyEvent::released(Key::Up), t0 + ms(400));
        core.on_key(&KeyEvent::pressed(Key::Up).repeated(), t0 + ms(430));

        assert_eq!(record.accepted(), vec![wheels(100.0, 100.0), wheels(0.0, 0.0)]);
        assert!(core.control_state().directions.held().is_empty());
    }

    #[test]
    fn test_release_without_press() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);

        core.on_key(&KeyEvent::released(Key::Left), t0);
        core.on_key(&KeyEvent::released(Key::Char('m')), t0);

        assert!(record.accepted().is_empty());
        assert!(core.is_quiescent());
    }

    #[test]
    fn test_busy_dropped_without_retry() {
        let t0 = Instant::now();
        let (mut core, record) = core(t0);
        record.set_busy_for(1);

        core.on_key(&KeyEvent::pressed(Key::Up), t0);
        assert!(record.accepted().is_empty());
        assert_eq!(record.rejected(), vec![wheels(100.0, 100.0)]);

        core.tick(t0 + ms(100));
        assert!(record.accepted().is_empty());

        core.on_key(&KeyEvent::released(Key::Up), t0 + ms(200));
        assert_eq!(record.accepted(), vec![wheels(0.0, 0.0)]);
        assert_eq!(core.status().report.dropped_busy, 1);
    }

    #[test]
    fn test_status() {
        let t0 = Instant::now();
        let (mut core, _) = core(t0);
        core.set_delay_profile("Venus").unwrap();

        core.on_key(&KeyEvent::pressed(Key::Right), t0);
        core.on_key(&KeyEvent::pressed(Key::Down), t0);

        let status = core.status();
        assert!(!status.paused);
        assert!(!status.quiescent);
        assert_eq!(status.held, vec![Direction::Right, Direction::Back]);
        assert_eq!(status.delay.profile, "Venus");
        assert_eq!(status.report.submitted, 0);
    }
}
