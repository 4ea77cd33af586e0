//! # Operator console commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use structopt::{clap, StructOpt};

use crate::input::Key;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Name used as the binary name when parsing a console line.
const CONSOLE_NAME: &str = "teleop";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command typed into the operator console.
#[derive(Debug, Clone, PartialEq, StructOpt)]
#[structopt(name = "teleop")]
pub enum ConsoleCmd {
    /// Press and hold a key.
    #[structopt(name = "press")]
    Press {
        /// Key name, e.g. `up`, `left`, `z` or `space`
        key: Key
    },

    /// Release a held key.
    #[structopt(name = "release")]
    Release {
        key: Key
    },

    /// Press a key and release it after the given number of seconds.
    #[structopt(name = "tap")]
    Tap {
        key: Key,

        /// How long to hold the key for in seconds.
        #[structopt(default_value = "0.5")]
        hold_s: f64
    },

    /// Select a delay profile (e.g. Moon, Venus, Mars, Manual).
    #[structopt(name = "profile")]
    Profile {
        name: String
    },

    /// Set the manual delay in seconds.
    #[structopt(name = "delay")]
    Delay {
        #[structopt(allow_hyphen_values = true)]
        seconds: f64
    },

    /// Pause the robot, stopping all motion immediately.
    #[structopt(name = "pause")]
    Pause,

    /// Resume operation after a pause.
    #[structopt(name = "resume")]
    Resume,

    /// Show the current delay and pause state.
    #[structopt(name = "status")]
    Status,

    /// Stop the robot and exit.
    #[structopt(name = "quit")]
    Quit
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ConsoleCmd {
    /// Parse a console line.
    ///
    /// Help and usage requests are returned as errors so the caller can print them.
    pub fn from_line(line: &str) -> Result<Self, clap::Error> {
        Self::from_iter_safe(
            std::iter::once(CONSOLE_NAME).chain(line.split_whitespace())
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_line() {
        assert_eq!(
            ConsoleCmd::from_line("press up").unwrap(), 
            ConsoleCmd::Press { key: Key::Up }
        );
        assert_eq!(
            ConsoleCmd::from_line("tap left 1.5").unwrap(),
            ConsoleCmd::Tap { key: Key::Left, hold_s: 1.5 }
        );
        assert_eq!(
            ConsoleCmd::from_line("tap z").unwrap(),
            ConsoleCmd::Tap { key: Key::Char('z'), hold_s: 0.5 }
        );
        assert_eq!(
            ConsoleCmd::from_line("profile Mars").unwrap(),
            ConsoleCmd::Profile { name: "Mars".into() }
        );
        assert_eq!(
            ConsoleCmd::from_line("delay -1").unwrap(),
            ConsoleCmd::Delay { seconds: -1.0 }
        );
        assert_eq!(ConsoleCmd::from_line("  pause ").unwrap(), ConsoleCmd::Pause);
        assert!(ConsoleCmd::from_line("press pageup").is_err());
        assert!(ConsoleCmd::from_line("fly").is_err());
    }
}
