//! The control thread and the handle the UI uses to talk to it

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{channel, Receiver, RecvTimeoutError, Sender},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use teleop_if::{
    eqpt::ActuatorSink,
    input::{Key, KeyEvent, KeyKind},
};

use super::{TeleopCore, TeleopError, TeleopStatus};
use crate::{
    delay::{validate_delay, DelayError, DelayStatus},
    params::TeleopParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A running control thread.
///
/// Dropping it stops the thread and leaves the robot stopped.
pub struct Teleop {
    handle: TeleopHandle,
    join_handle: Option<JoinHandle<()>>,
}

/// Cloneable handle onto the control thread.
#[derive(Clone)]
pub struct TeleopHandle {
    tx: Sender<ControlSignal>,
    paused: Arc<AtomicBool>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Signals sent to the control thread.
///
/// Signals which carry a sender are answered once handled.
#[derive(Debug)]
enum ControlSignal {
    Key(KeyEvent),
    SelectProfile(String, Sender<Result<DelayStatus, DelayError>>),
    SetManualDelay(f64, Sender<Result<DelayStatus, DelayError>>),
    Pause(Sender<bool>),
    Resume(Sender<bool>),
    TogglePause(Sender<bool>),
    Status(Sender<TeleopStatus>),
    Shutdown,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Teleop {
    /// Start the control thread.
    ///
    /// The robot starts un-paused with the idle clock counting from now.
    pub fn spawn(
        params: &TeleopParams,
        sink: Box<dyn ActuatorSink>
    ) -> Result<Self, TeleopError> {
        let core = TeleopCore::new(params, sink, Instant::now())?;
        let delay = core.delay_status();

        let (tx, rx) = channel();
        let paused = Arc::new(AtomicBool::new(core.is_paused()));
        let thread_paused = paused.clone();

        let join_handle = thread::Builder::new()
            .name("teleop_ctrl".into())
            .spawn(move || control_thread(core, rx, thread_paused))
            .map_err(TeleopError::SpawnFailed)?;

        info!(
            "Control thread started, delay profile {} ({:.1} s)",
            delay.profile, delay.delay_s
        );

        Ok(Self {
            handle: TeleopHandle { tx, paused },
            join_handle: Some(join_handle)
        })
    }

    /// Get a new handle onto the control thread.
    pub fn handle(&self) -> TeleopHandle {
        self.handle.clone()
    }

    /// Stop the control thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        if let Some(j) = self.join_handle.take() {
            self.handle.shutdown();
            if j.join().is_err() {
                warn!("The control thread panicked");
            }
        }
    }
}

impl Drop for Teleop {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

impl TeleopHandle {
    /// Forward a key-down event. Never blocks.
    pub fn on_key_down(&self, key: Key, auto_repeat: bool) -> Result<(), TeleopError> {
        self.on_key(KeyEvent { key, kind: KeyKind::Pressed, auto_repeat })
    }

    /// Forward a key-up event. Never blocks.
    pub fn on_key_up(&self, key: Key, auto_repeat: bool) -> Result<(), TeleopError> {
        self.on_key(KeyEvent { key, kind: KeyKind::Released, auto_repeat })
    }

    pub fn on_key(&self, event: KeyEvent) -> Result<(), TeleopError> {
        self.send(ControlSignal::Key(event))
    }

    /// Select a delay profile by name.
    pub fn set_delay_profile(&self, name: &str) -> Result<DelayStatus, TeleopError> {
        let (tx, rx) = channel();
        self.send(ControlSignal::SelectProfile(name.to_string(), tx))?;
        Ok(Self::reply(rx)??)
    }

    /// Set the manual delay. Invalid values are rejected here and never reach
    /// the control thread.
    pub fn set_manual_delay(&self, delay_s: f64) -> Result<DelayStatus, TeleopError> {
        let delay_s = validate_delay(delay_s)?;

        let (tx, rx) = channel();
        self.send(ControlSignal::SetManualDelay(delay_s, tx))?;
        Ok(Self::reply(rx)??)
    }

    /// Pause the robot, returns once the stop has been sent.
    pub fn pause(&self) -> Result<(), TeleopError> {
        let (tx, rx) = channel();
        self.send(ControlSignal::Pause(tx))?;
        Self::reply(rx).map(|_| ())
    }

    /// Resume, returns false if the robot wasn't paused.
    pub fn resume(&self) -> Result<bool, TeleopError> {
        let (tx, rx) = channel();
        self.send(ControlSignal::Resume(tx))?;
        Self::reply(rx)
    }

    /// Toggle the pause state, returning the new state.
    pub fn toggle_pause(&self) -> Result<bool, TeleopError> {
        let (tx, rx) = channel();
        self.send(ControlSignal::TogglePause(tx))?;
        Self::reply(rx)
    }

    /// The pause state as of the last signal the control thread handled.
    pub fn current_pause_state(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn delay_status(&self) -> Result<DelayStatus, TeleopError> {
        self.status().map(|s| s.delay)
    }

    pub fn status(&self) -> Result<TeleopStatus, TeleopError> {
        let (tx, rx) = channel();
        self.send(ControlSignal::Status(tx))?;
        Self::reply(rx)
    }

    /// Ask the control thread to stop, doesn't wait for it to exit.
    pub fn shutdown(&self) {
        if self.send(ControlSignal::Shutdown).is_err() {
            debug!("Shutdown requested but the control thread had already stopped");
        }
    }

    fn send(&self, signal: ControlSignal) -> Result<(), TeleopError> {
        self.tx.send(signal).map_err(|_| TeleopError::ControlThreadGone)
    }

    fn reply<T>(rx: Receiver<T>) -> Result<T, TeleopError> {
        rx.recv().map_err(|_| TeleopError::ControlThreadGone)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn control_thread(mut core: TeleopCore, rx: Receiver<ControlSignal>, paused: Arc<AtomicBool>) {
    // The robot must be left stopped even if the loop panics
    let run = panic::catch_unwind(AssertUnwindSafe(|| control_loop(&mut core, &rx, &paused)));
    if run.is_err() {
        error!("The control loop panicked, stopping the robot");
    }

    core.shutdown();
    paused.store(core.is_paused(), Ordering::SeqCst);
    info!("Control thread stopped");

    if let Err(payload) = run {
        panic::resume_unwind(payload);
    }
}

fn control_loop(core: &mut TeleopCore, rx: &Receiver<ControlSignal>, paused: &AtomicBool) {
    'main: loop {
        // Sleep until the next signal or deadline
        let first = match core.next_deadline() {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(timeout) {
                    Ok(s) => Some(s),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break 'main
                }
            },
            None => match rx.recv() {
                Ok(s) => Some(s),
                Err(_) => break 'main
            }
        };

        // Handle everything that's queued before firing any timers
        if let Some(signal) = first {
            if !handle_signal(core, signal, paused) {
                break 'main
            }
            while let Ok(signal) = rx.try_recv() {
                if !handle_signal(core, signal, paused) {
                    break 'main
                }
            }
        }

        core.tick(Instant::now());
    }
}

/// Handle a single signal, returns false if the thread should stop.
fn handle_signal(core: &mut TeleopCore, signal: ControlSignal, paused: &AtomicBool) -> bool {
    let now = Instant::now();

    // Replies are allowed to fail, the caller may have given up waiting
    match signal {
        ControlSignal::Key(event) => {
            core.on_key(&event, now);
        },
        ControlSignal::SelectProfile(name, reply) => {
            reply.send(core.set_delay_profile(&name)).ok();
        },
        ControlSignal::SetManualDelay(delay_s, reply) => {
            reply.send(core.set_manual_delay(delay_s)).ok();
        },
        ControlSignal::Pause(reply) => {
            core.pause(now);
            paused.store(true, Ordering::SeqCst);
            reply.send(true).ok();
        },
        ControlSignal::Resume(reply) => {
            let resumed = core.resume(now);
            paused.store(core.is_paused(), Ordering::SeqCst);
            reply.send(resumed).ok();
        },
        ControlSignal::TogglePause(reply) => {
            let state = core.toggle_pause(now);
            paused.store(state, Ordering::SeqCst);
            reply.send(state).ok();
        },
        ControlSignal::Status(reply) => {
            reply.send(core.status()).ok();
        },
        ControlSignal::Shutdown => return false
    }

    // Space can toggle the pause from a key event
    paused.store(core.is_paused(), Ordering::SeqCst);

    true
}
