//! # Camera Equipment Interface
//!
//! Frames arrive from the camera asynchronously and are handed straight to the display, they
//! never pass through the command dispatcher.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An individual raw frame from the camera.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CamFrame {
    /// UTC timestamp at which the frame was acquired
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Sequence number of the frame, incremented by the source for each frame
    pub seq: u64,

    /// Width of the frame in pixels
    pub width: u32,

    /// Height of the frame in pixels
    pub height: u32,

    /// The raw image data, the layout is only understood by the display
    pub data: Vec<u8>
}

/// Callback handed to a [`FrameSource`] through which new frames are delivered.
///
/// Sending never blocks the source.
#[derive(Clone, Debug)]
pub struct FrameSender {
    tx: Sender<CamFrame>
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of camera frames, such as the robot's camera stream.
pub trait FrameSource {
    /// Begin delivering frames to the given sender.
    fn start(&mut self, sender: FrameSender) -> Result<(), CamError>;

    /// Stop delivering frames.
    fn stop(&mut self);
}

/// The display surface frames are shown on.
pub trait FrameSink: Send {
    /// Show a frame.
    fn show(&mut self, frame: CamFrame);
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised by a [`FrameSource`].
#[derive(thiserror::Error, Debug)]
pub enum CamError {
    #[error("The camera stream is already running")]
    AlreadyStarted,

    #[error("Could not start the camera stream: {0}")]
    StartFailed(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CamFrame {
    /// Create a new frame acquired now.
    pub fn new(seq: u64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            timestamp: Utc::now(),
            seq,
            width,
            height,
            data
        }
    }
}

impl FrameSender {
    pub fn new(tx: Sender<CamFrame>) -> Self {
        Self { tx }
    }

    /// Deliver a frame, returns `false` if nothing is listening any more.
    pub fn send(&self, frame: CamFrame) -> bool {
        self.tx.send(frame).is_ok()
    }
}
