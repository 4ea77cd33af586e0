//! # Camera relay
//!
//! Forwards camera frames to the display on a thread of its own. Frames never
//! pass through the control thread, so the live feed isn't affected by the
//! command delay.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace, warn};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    mpsc::{channel, Receiver},
    Arc,
};
use std::thread::{self, JoinHandle};
use teleop_if::eqpt::{CamFrame, FrameSender, FrameSink};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A running camera relay.
///
/// The relay stops once every [`FrameSender`] it handed out has been dropped.
pub struct CamRelay {
    counters: Arc<Counters>,
    join_handle: JoinHandle<()>,
}

#[derive(Default)]
struct Counters {
    shown: AtomicU64,
    skipped: AtomicU64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CamRelayError {
    #[error("Could not start the camera relay thread: {0}")]
    SpawnFailed(std::io::Error),

    #[error("The camera relay thread panicked")]
    Panicked,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CamRelay {
    /// Start relaying frames to `sink`.
    ///
    /// The returned sender is the callback to hand to the camera.
    pub fn start(sink: Box<dyn FrameSink>) -> Result<(Self, FrameSender), CamRelayError> {
        let (tx, rx) = channel();
        let counters = Arc::new(Counters::default());
        let thread_counters = counters.clone();

        let join_handle = thread::Builder::new()
            .name("cam_relay".into())
            .spawn(move || relay_thread(sink, rx, thread_counters))
            .map_err(CamRelayError::SpawnFailed)?;

        Ok((
            Self { counters, join_handle },
            FrameSender::new(tx)
        ))
    }

    /// Number of frames given to the display.
    pub fn frames_shown(&self) -> u64 {
        self.counters.shown.load(Ordering::Relaxed)
    }

    /// Number of frames dropped because the display fell behind.
    pub fn frames_skipped(&self) -> u64 {
        self.counters.skipped.load(Ordering::Relaxed)
    }

    /// Wait for the relay to stop.
    pub fn join(self) -> Result<(), CamRelayError> {
        let Self { counters, join_handle } = self;

        join_handle.join().map_err(|_| CamRelayError::Panicked)?;
        debug!(
            "Camera relay stopped, {} frames shown, {} skipped",
            counters.shown.load(Ordering::Relaxed),
            counters.skipped.load(Ordering::Relaxed)
        );

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn relay_thread(mut sink: Box<dyn FrameSink>, rx: Receiver<CamFrame>, counters: Arc<Counters>) {
    while let Ok(mut frame) = rx.recv() {
        // Only the newest frame is worth showing
        let mut num_skipped = 0;
        while let Ok(newer) = rx.try_recv() {
            frame = newer;
            num_skipped += 1;
        }

        if num_skipped > 0 {
            trace!("Display behind, skipped {} frame(s)", num_skipped);
            counters.skipped.fetch_add(num_skipped, Ordering::Relaxed);
        }

        counters.shown.fetch_add(1, Ordering::Relaxed);
        sink.show(frame);
    }

    if counters.shown.load(Ordering::Relaxed) == 0 {
        warn!("Camera relay stopped without showing any frames");
    }
}
