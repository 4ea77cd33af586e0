//! Simulated collaborators
//!
//! Stand-ins for the robot's actuator driver and camera, used by the
//! executable when no robot is attached and by the tests.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod actuator;
mod camera;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use actuator::*;
pub use camera::*;
