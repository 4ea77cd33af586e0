//! # Teleoperation Executable Parameters
//!
//! Every section has defaults so a partial parameter file, or none at all in
//! the tests, gives a working configuration.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{
    delay::DelayParams,
    dispatch::{DispatchParams, DriveParams},
    idle::IdleParams,
    input::KeyMapParams,
    sim::SimCamParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeleopParams {
    /// Speeds used to turn intents into actuator commands
    pub drive: DriveParams,

    /// Dispatcher behaviour
    pub dispatch: DispatchParams,

    /// Idle animation timing
    pub idle: IdleParams,

    /// Delay profile table
    pub delay: DelayParams,

    /// Keyboard bindings
    pub keys: KeyMapParams,

    /// Simulated camera stream
    pub sim_cam: SimCamParams,
}
