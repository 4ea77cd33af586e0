//! # Simulated camera and display

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chrono::Utc;
use log::{debug, trace, warn};
use serde::Deserialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use teleop_if::eqpt::{CamError, CamFrame, FrameSender, FrameSink, FrameSource};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest frame the simulated camera will produce.
///
/// Units: bytes
const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimCamParams {
    /// Frame rate of the simulated stream.
    ///
    /// Units: frames/second
    pub fps: f64,

    pub width: u32,
    pub height: u32,
}

/// A camera which produces blank greyscale frames at a fixed rate.
pub struct SimCamera {
    params: SimCamParams,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// A display which logs the frames it's given.
#[derive(Default)]
pub struct SimDisplay {
    num_shown: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimCamParams {
    fn default() -> Self {
        Self {
            fps: 15.0,
            width: 320,
            height: 240
        }
    }
}

impl SimCamera {
    pub fn new(params: SimCamParams) -> Self {
        Self {
            params,
            running: Arc::new(AtomicBool::new(false)),
            handle: None
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl FrameSource for SimCamera {
    fn start(&mut self, sender: FrameSender) -> Result<(), CamError> {
        if self.handle.is_some() {
            return Err(CamError::AlreadyStarted)
        }

        let period = frame_period(self.params.fps)?;
        let width = self.params.width;
        let height = self.params.height;
        let num_bytes = frame_bytes(width, height)?;
        let running = self.running.clone();
        running.store(true, Ordering::Relaxed);

        let handle = thread::Builder::new()
            .name("sim_cam".into())
            .spawn(move || {
                let mut seq = 0u64;
                while running.load(Ordering::Relaxed) {
                    let data = vec![0u8; num_bytes];
                    if !sender.send(CamFrame::new(seq, width, height, data)) {
                        debug!("Nothing is listening to the camera, stopping the stream");
                        break
                    }
                    seq += 1;
                    thread::sleep(period);
                }
                running.store(false, Ordering::Relaxed);
            })
            .map_err(|e| CamError::StartFailed(e.to_string()))?;

        self.handle = Some(handle);

        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            if h.join().is_err() {
                warn!("The simulated camera thread panicked");
            }
        }
    }
}

impl Drop for SimCamera {
    fn drop(&mut self) {
        self.stop();
    }
}

impl SimDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for SimDisplay {
    fn show(&mut self, frame: CamFrame) {
        self.num_shown += 1;

        let age_ms = (Utc::now() - frame.timestamp).num_milliseconds();
        trace!(
            "Frame {} ({}x{}) shown, {} ms old",
            frame.seq, frame.width, frame.height, age_ms
        );

        if self.num_shown % 100 == 0 {
            debug!("{} frames shown", self.num_shown);
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Time between two frames at the given rate.
fn frame_period(fps: f64) -> Result<Duration, CamError> {
    let period = match fps.is_nan() || fps <= 0.0 {
        true => None,
        false => Duration::try_from_secs_f64(1.0 / fps).ok()
    };

    period
        .filter(|p| *p > Duration::from_secs(0))
        .ok_or_else(|| CamError::StartFailed(format!("Frame rate {} is out of range", fps)))
}

/// Size of a greyscale frame.
fn frame_bytes(width: u32, height: u32) -> Result<usize, CamError> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|b| *b <= MAX_FRAME_BYTES)
        .ok_or_else(|| CamError::StartFailed(format!(
            "A {}x{} frame is larger than {} bytes", width, height, MAX_FRAME_BYTES
        )))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_stream() {
        let mut cam = SimCamera::new(SimCamParams {
            fps: 200.0,
            width: 4,
            height: 2
        });
        let (tx, rx) = channel();

        cam.start(FrameSender::new(tx.clone())).unwrap();
        assert!(cam.is_running());
        assert!(matches!(
            cam.start(FrameSender::new(tx)),
            Err(CamError::AlreadyStarted)
        ));

        let first = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_eq!(first.data.len(), 8);

        cam.stop();
        assert!(!cam.is_running());
    }

    #[test]
    fn test_invalid_rate() {
        let mut cam = SimCamera::new(SimCamParams {
            fps: 0.0,
            ..Default::default()
        });
        let (tx, _rx) = channel();

        assert!(matches!(
            cam.start(FrameSender::new(tx)),
            Err(CamError::StartFailed(_))
        ));
        assert!(!cam.is_running());

        for &fps in [f64::NAN, -1.0, f64::MIN_POSITIVE / 4.0, 1e-320, f64::INFINITY].iter() {
            assert!(matches!(frame_period(fps), Err(CamError::StartFailed(_))), "{}", fps);
        }
        assert_eq!(frame_period(4.0).unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_size() {
        let mut cam = SimCamera::new(SimCamParams {
            width: u32::MAX,
            height: u32::MAX,
            ..Default::default()
        });
        let (tx, _rx) = channel();

        assert!(matches!(
            cam.start(FrameSender::new(tx)),
            Err(CamError::StartFailed(_))
        ));
        assert_eq!(frame_bytes(320, 240).unwrap(), 76_800);
    }
}
