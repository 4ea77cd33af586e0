//! Interactive operator console

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Report};
use log::{debug, warn};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::thread;
use teleop_if::console::ConsoleCmd;

use teleop_lib::teleop::{TeleopError, TeleopHandle};
use util::{session::Session, time::seconds_to_duration};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "teleop $ ";

const HISTORY_FILE: &str = "history.txt";

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Read commands from the operator until they quit.
pub fn run(handle: &TeleopHandle, session: &Session) -> Result<(), Report> {
    let mut rl = DefaultEditor::new().wrap_err("Failed to start the console")?;

    let history_path = session.session_root.join(HISTORY_FILE);
    if rl.load_history(&history_path).is_err() {
        debug!("No console history loaded");
    }

    println!("Type `help` for the list of commands");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue
                }
                rl.add_history_entry(line.as_str()).ok();

                match ConsoleCmd::from_line(&line) {
                    Ok(cmd) => {
                        if !exec(handle, cmd)? {
                            break
                        }
                    },
                    // Includes help and usage messages
                    Err(e) => println!("{}", e.message)
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).wrap_err("Failed to read from the console")
        }
    }

    if let Err(e) = rl.save_history(&history_path) {
        warn!("Could not save the console history: {}", e);
    }

    Ok(())
}

/// Execute a console command, returns false if the operator wants to quit.
fn exec(handle: &TeleopHandle, cmd: ConsoleCmd) -> Result<bool, Report> {
    let result = match cmd {
        ConsoleCmd::Press { key } => handle.on_key_down(key, false),
        ConsoleCmd::Release { key } => handle.on_key_up(key, false),
        ConsoleCmd::Tap { key, hold_s } => {
            handle.on_key_down(key, false)?;

            let h = handle.clone();
            let hold = seconds_to_duration(hold_s);
            thread::spawn(move || {
                thread::sleep(hold);
                h.on_key_up(key, false).ok();
            });

            Ok(())
        },
        ConsoleCmd::Profile { name } => handle.set_delay_profile(&name).map(|s| {
            println!("Profile {}, delay {:.1} s", s.profile, s.delay_s);
        }),
        ConsoleCmd::Delay { seconds } => handle.set_manual_delay(seconds).map(|s| {
            println!("Delay {:.1} s", s.delay_s);
        }),
        ConsoleCmd::Pause => handle.pause().map(|_| println!("Paused")),
        ConsoleCmd::Resume => handle.resume().map(|resumed| match resumed {
            true => println!("Resumed"),
            false => println!("Not paused"),
        }),
        ConsoleCmd::Status => handle.status().map(|s| {
            println!(
                "{} | {} {:.1} s{} | held {:?} | idle {:?}",
                if s.paused { "PAUSED" } else { "running" },
                s.delay.profile,
                s.delay.delay_s,
                if s.delay.locked { " (locked)" } else { "" },
                s.held,
                s.idle
            );
            println!(
                "released {}, superseded {}, dropped {} busy / {} fault",
                s.report.submitted,
                s.report.superseded,
                s.report.dropped_busy,
                s.report.dropped_fault
            );
        }),
        ConsoleCmd::Quit => return Ok(false)
    };

    match result {
        Ok(()) => Ok(true),
        Err(TeleopError::Delay(e)) => {
            println!("{}", e);
            Ok(true)
        },
        Err(e) => Err(e).wrap_err("Lost contact with the control thread")
    }
}
