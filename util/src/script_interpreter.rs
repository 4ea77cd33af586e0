//! # Key-event script interpreter module
//!
//! This module provides an interpreter for teleoperation scripts, allowing 
//! operator input to be replayed at fixed times.
//!
//! Scripts contain one entry per line, `<time_s>: <json>;`, for example:
//!
//! ```text
//! 0.5: {"key": "Up", "kind": "Pressed"};
//! 1.5: {"key": "Up", "kind": "Released"};
//! 2.0: {"profile": "Mars"};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use teleop_if::script::{ScriptAction, ScriptActionParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An action which is scripted to occur at a specific time.
#[derive(Debug)]
pub struct Command {
    /// The time the action is supposed to execute at
    exec_time_s: f64,

    /// The action to run
    action: ScriptAction
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use 
/// `.get_pending_actions` to acquire a list of actions that need executing.
#[derive(Debug)]
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid action at {0} s: {1}")]
    InvalidAction(f64, ScriptActionParseError),

    #[error("Script entries must be in time order, {0} s comes after {1} s")]
    OutOfOrder(f64, f64)
}

#[derive(Debug)]
pub enum PendingActions {
    None,
    Some(Vec<ScriptAction>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());
        
        // Check that the script file exists.
        if !path.exists() {
            return Err(
                ScriptError::ScriptNotFound(path.display().to_string()));
        }

        // Load the script into a string
        let script = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e))
        };

        let cmds = Self::parse(&script)?;

        Ok(ScriptInterpreter {
            _script_path: path,
            cmds
        })
    }

    /// Create a new interpreter from the script's text.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {
        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            cmds: Self::parse(script)?
        })
    }

    /// Return the actions whose time has passed, or `None` if nothing needs
    /// executing now.
    pub fn get_pending_actions(&mut self, current_time_s: f64) -> PendingActions {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingActions::EndOfScript
        }

        let mut action_vec: Vec<ScriptAction> = vec![];

        // Pop items from the queue while the head's exec time is lower than
        // the current time.
        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s >= current_time_s {
                break
            }
            if let Some(cmd) = self.cmds.pop_front() {
                action_vec.push(cmd.action);
            }
        }

        // If the vector is longer than 0 return Some, otherwise None
        if !action_vec.is_empty() {
            PendingActions::Some(action_vec)
        }
        else {
            PendingActions::None
        }
    }

    /// Time in seconds until the next action is due, or `None` at the end
    /// of the script.
    pub fn time_to_next_s(&self, current_time_s: f64) -> Option<f64> {
        self.cmds.front().map(|c| (c.exec_time_s - current_time_s).max(0.0))
    }

    /// Get the number of actions remaining in the script
    pub fn get_num_actions(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }

    fn parse(script: &str) -> Result<VecDeque<Command>, ScriptError> {
        // Empty queue of commands
        let mut queue: VecDeque<Command> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("The script regex is invalid");

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = match cap[1].parse() {
                Ok(t) => t,
                Err(e) => return Err(
                    ScriptError::InvalidTimestamp(format!("{}", e)))
            };

            // Parse the action from the payload
            let action = match ScriptAction::from_json(&cap[3]) {
                Ok(a) => a,
                Err(e) => return Err(ScriptError::InvalidAction(
                    exec_time_s, e
                ))
            };

            if let Some(prev) = queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(exec_time_s, prev.exec_time_s))
                }
            }

            // Build command from the match
            queue.push_back(Command {
                exec_time_s,
                action
            });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(queue)
    }
}
