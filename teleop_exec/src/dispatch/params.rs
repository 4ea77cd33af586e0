//! Parameters structure for command dispatch

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for converting intents into actuator demands.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriveParams {

    /// Wheel speed used for all driving.
    ///
    /// Units: millimeters/second
    pub speed_mms: f64,

    /// Factor applied to the outer wheel when turning while driving.
    pub turn_factor: f64,

    /// Head angular speed.
    ///
    /// Units: radians/second
    pub head_speed_rads: f64,

    /// Lift angular speed.
    ///
    /// Units: radians/second
    pub lift_speed_rads: f64,
}

/// Parameters for the dispatcher.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DispatchParams {
    /// How a movement intent which resolves to a stop is released.
    pub stop_release: StopRelease,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// How a movement intent which resolves to a stop is released.
///
/// Stops triggered by pausing are always immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StopRelease {
    /// Stops wait for the configured delay like any other command.
    Delayed,

    /// Stops cancel any pending movement and are released at once.
    Immediate
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            speed_mms: 100.0,
            turn_factor: 2.0,
            head_speed_rads: 0.3,
            lift_speed_rads: 1.0,
        }
    }
}

impl Default for StopRelease {
    fn default() -> Self {
        StopRelease::Delayed
    }
}
