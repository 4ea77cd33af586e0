//! # Teleoperation library.
//!
//! Emulates the communication delay of driving a rover on another planet. Key
//! presses are turned into motion intents which reach the robot only after
//! the delay of the selected destination, while the camera feed is relayed
//! live.
//!
//! This library allows the executable and its tests to access items defined
//! inside the teleoperation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Camera relay - forwards frames to the display independently of commands
pub mod cam_relay;

/// Delay policy - maps the selected destination to a command delay
pub mod delay;

/// Direction stack - resolves held keys into a single motion intent
pub mod direction;

/// Command dispatcher - releases the latest intent once the delay has elapsed
pub mod dispatch;

/// Idle behaviour controller - runs the idle animation when the operator is quiet
pub mod idle;

/// Input translator - maps key events onto operator inputs
pub mod input;

/// Executable parameters
pub mod params;

/// Simulated actuators and camera
pub mod sim;

/// Control thread and the handle the UI uses to reach it
pub mod teleop;
