//! Plays a key-event script against the control thread

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::thread;
use std::time::{Duration, Instant};
use teleop_if::script::ScriptAction;

use teleop_lib::teleop::{TeleopError, TeleopHandle};
use util::{
    script_interpreter::{PendingActions, ScriptInterpreter},
    session,
    time::seconds_to_duration,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// How often the robot is checked for quiescence once the script has ended.
const SETTLE_POLL_PERIOD: Duration = Duration::from_millis(100);

/// How long to wait, on top of the command delay, for the robot to settle.
const SETTLE_MARGIN_S: f64 = 2.0;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run the script to the end, then wait for the last commands to be released.
pub fn run(handle: &TeleopHandle, mut si: ScriptInterpreter) -> Result<(), Report> {
    let start_s = session::get_elapsed_seconds();

    loop {
        let script_time_s = session::get_elapsed_seconds() - start_s;

        match si.get_pending_actions(script_time_s) {
            PendingActions::None => (),
            PendingActions::Some(actions) => {
                for action in actions {
                    exec(handle, action)?;
                }
            },
            PendingActions::EndOfScript => {
                info!("End of script reached at {:.2} s", script_time_s);
                break
            }
        }

        // Sleep until the next action, the script is ended on the next loop
        // if there isn't one
        let now_s = session::get_elapsed_seconds() - start_s;
        if let Some(dt) = si.time_to_next_s(now_s) {
            thread::sleep(seconds_to_duration(dt));
        }
    }

    wait_for_settle(handle)
}

fn exec(handle: &TeleopHandle, action: ScriptAction) -> Result<(), Report> {
    debug!("Script action: {:?}", action);

    let result = match action {
        ScriptAction::Key(event) => handle.on_key(event),
        ScriptAction::Profile { profile } => handle.set_delay_profile(&profile).map(|_| ()),
        ScriptAction::Delay { delay } => handle.set_manual_delay(delay).map(|_| ()),
        ScriptAction::Pause { pause: true } => handle.pause(),
        ScriptAction::Pause { pause: false } => handle.resume().map(|_| ()),
    };

    match result {
        Ok(()) => Ok(()),
        Err(TeleopError::Delay(e)) => {
            warn!("Script action rejected: {}", e);
            Ok(())
        },
        Err(e) => Err(e).wrap_err("Failed to execute script action")
    }
}

/// Wait for every pending command to be released.
fn wait_for_settle(handle: &TeleopHandle) -> Result<(), Report> {
    let status = handle.status()?;
    if status.paused {
        info!("Script ended with the robot paused");
        return Ok(())
    }

    let max_wait = seconds_to_duration(status.delay.delay_s + SETTLE_MARGIN_S);
    let start = Instant::now();

    loop {
        let status = handle.status()?;
        if status.quiescent {
            info!("Robot at rest, dispatch report: {:?}", status.report);
            return Ok(())
        }

        if start.elapsed() > max_wait {
            warn!(
                "Robot still active {:.1} s after the end of the script, held: {:?}",
                max_wait.as_secs_f64(),
                status.held
            );
            return Ok(())
        }

        thread::sleep(SETTLE_POLL_PERIOD);
    }
}
