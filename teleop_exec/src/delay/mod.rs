//! Delay policy module
//!
//! Maps the operator's chosen destination (Moon, Venus, Mars...) to the
//! delay injected before each command is released to the robot.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Canonical name of the operator-editable profile.
pub const MANUAL_PROFILE_NAME: &str = "Manual";

/// Names accepted for the manual profile.
pub const MANUAL_PROFILE_ALIASES: [&str; 2] = ["Manual", "Manuel"];

/// Longest delay accepted for a profile or the manual field, an hour is well
/// beyond the worst Earth to Mars light time.
///
/// Units: seconds
pub const MAX_DELAY_S: f64 = 3600.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when changing the delay.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DelayError {
    #[error("No delay profile named \"{0}\"")]
    UnknownProfile(String),

    #[error("Delays must be between 0 and {} seconds, got {0}", MAX_DELAY_S)]
    InvalidDelay(f64),

    #[error("The delay is locked by the \"{0}\" profile, select the manual profile to edit it")]
    Locked(String),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Check that a delay value is usable, finite and within `0..=MAX_DELAY_S`.
pub fn validate_delay(delay_s: f64) -> Result<f64, DelayError> {
    if (0.0..=MAX_DELAY_S).contains(&delay_s) {
        Ok(delay_s)
    }
    else {
        Err(DelayError::InvalidDelay(delay_s))
    }
}

/// Returns true if `name` refers to the manual profile.
pub fn is_manual_name(name: &str) -> bool {
    MANUAL_PROFILE_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(name.trim()))
}
