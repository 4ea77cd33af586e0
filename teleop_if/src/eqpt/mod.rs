//! # Equipment interfaces

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod act;
pub mod cam;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use act::{ActuatorCmd, ActuatorError, ActuatorSink};
pub use cam::{CamError, CamFrame, FrameSender, FrameSink, FrameSource};
