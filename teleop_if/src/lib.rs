//! # Teleoperation interface crate.
//!
//! Provides the interfaces between the teleoperation core and its
//! collaborators: the robot's actuators, its camera, the operator's keyboard
//! and the operator console.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command and data definitions for equipment (actuators and camera)
pub mod eqpt;

/// Keyboard events from the operator
pub mod input;

/// Commands typed into the operator console
pub mod console;

/// Entries of a timed key-event script
pub mod script;
