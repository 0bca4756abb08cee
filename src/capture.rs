//! Camera capture and hand-landmark detection.
//!
//! The camera and the landmark model sit behind [`HandLandmarker`]. Loading
//! happens on a background thread; until it finishes the detector reports
//! [`CaptureStatus::Loading`] and the gesture stays `None`. Any failure puts
//! the surface into a degraded, manual-only mode. There is no retry.
//!
//! ```ignore
//! let cell = GestureCell::new();
//! let mut surface = CaptureSurface::start(ReplayLoader::new(path), request, cell.clone());
//! // once per frame:
//! surface.tick(elapsed);
//! ```

use crate::control::{CaptureStatus, GestureCell};
use crate::error::CaptureError;
use crate::gesture::{analyze, classify, Gesture, HandLandmarks};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Which way the requested camera faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    /// Front-facing, toward the user.
    #[default]
    User,
    /// Rear-facing.
    Environment,
}

/// Parameters for opening the camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureRequest {
    pub width: u32,
    pub height: u32,
    pub facing: Facing,
    /// Maximum number of hands to detect. Only the first is classified.
    pub max_hands: u32,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            facing: Facing::User,
            max_hands: 1,
        }
    }
}

impl CaptureError {
    /// Whether this error came from the camera rather than the model.
    pub fn is_camera_failure(&self) -> bool {
        matches!(self, CaptureError::PermissionDenied | CaptureError::Unavailable(_))
    }
}

/// A camera plus hand-landmark model, polled once per frame.
pub trait HandLandmarker {
    /// Grab the latest frame and return the first detected hand, if any.
    ///
    /// `timestamp` is the time since capture started.
    fn detect(&mut self, timestamp: Duration) -> Result<Option<HandLandmarks>, CaptureError>;
}

/// Builds a [`HandLandmarker`]; run on a background thread.
pub trait LandmarkerLoader: Send + 'static {
    fn load(self: Box<Self>, request: CaptureRequest) -> Result<Box<dyn HandLandmarker + Send>, CaptureError>;
}

impl<F> LandmarkerLoader for F
where
    F: FnOnce(CaptureRequest) -> Result<Box<dyn HandLandmarker + Send>, CaptureError> + Send + 'static,
{
    fn load(self: Box<Self>, request: CaptureRequest) -> Result<Box<dyn HandLandmarker + Send>, CaptureError> {
        (*self)(request)
    }
}

// ========== Replay ==========

fn default_frame_rate() -> f32 {
    30.0
}

/// A recorded sequence of landmark frames.
///
/// JSON layout: `{"frame_rate": 30.0, "frames": [null, [[x, y, z], ...21]]}`.
/// `null` frames mean no hand was visible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    pub frames: Vec<Option<HandLandmarks>>,
}

impl Recording {
    /// Read a recording from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CaptureError> {
        let json = fs::read_to_string(path).map_err(|source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Plays back a [`Recording`] in a loop, picking frames by timestamp.
#[derive(Clone, Debug)]
pub struct ReplayLandmarker {
    recording: Recording,
}

impl ReplayLandmarker {
    pub fn new(recording: Recording) -> Self {
        Self { recording }
    }

    /// Frame index shown at `timestamp`.
    pub fn frame_index(&self, timestamp: Duration) -> Option<usize> {
        let len = self.recording.frames.len();
        if len == 0 {
            return None;
        }
        let rate = if self.recording.frame_rate > 0.0 {
            self.recording.frame_rate
        } else {
            default_frame_rate()
        };
        let frame = (timestamp.as_secs_f64() * rate as f64) as usize;
        Some(frame % len)
    }
}

impl HandLandmarker for ReplayLandmarker {
    fn detect(&mut self, timestamp: Duration) -> Result<Option<HandLandmarks>, CaptureError> {
        Ok(self
            .frame_index(timestamp)
            .and_then(|i| self.recording.frames[i].clone()))
    }
}

/// Loads a [`ReplayLandmarker`] from a recording file.
#[derive(Clone, Debug)]
pub struct ReplayLoader {
    path: PathBuf,
}

impl ReplayLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LandmarkerLoader for ReplayLoader {
    fn load(self: Box<Self>, _request: CaptureRequest) -> Result<Box<dyn HandLandmarker + Send>, CaptureError> {
        let recording = Recording::load(&self.path)?;
        log::info!(
            "Loaded landmark recording {} ({} frames @ {} fps)",
            self.path.display(),
            recording.frames.len(),
            recording.frame_rate
        );
        Ok(Box::new(ReplayLandmarker::new(recording)))
    }
}

/// Loader used when no camera backend is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCamera;

impl LandmarkerLoader for NoCamera {
    fn load(self: Box<Self>, _request: CaptureRequest) -> Result<Box<dyn HandLandmarker + Send>, CaptureError> {
        Err(CaptureError::Unavailable("no camera backend configured".into()))
    }
}

// ========== Detection ==========

/// Runs the classifier on each frame and publishes changes to the shared cell.
pub struct GestureDetector {
    landmarker: Box<dyn HandLandmarker + Send>,
    cell: GestureCell,
}

impl GestureDetector {
    pub fn new(landmarker: Box<dyn HandLandmarker + Send>, cell: GestureCell) -> Self {
        Self { landmarker, cell }
    }

    /// Detect and classify one frame. Detection errors count as no hand.
    pub fn tick(&mut self, timestamp: Duration) -> Gesture {
        let hand = match self.landmarker.detect(timestamp) {
            Ok(hand) => hand,
            Err(e) => {
                log::warn!("Hand detection failed: {}", e);
                None
            }
        };

        if let Some(hand) = &hand {
            log::debug!("Hand analysis: {:?}", analyze(hand));
        }

        let gesture = classify(hand.as_ref());
        if self.cell.publish(gesture) {
            log::info!("Gesture changed to {}", gesture);
        }
        gesture
    }
}

enum SurfaceState {
    Loading(Receiver<Result<Box<dyn HandLandmarker + Send>, CaptureError>>),
    Running(GestureDetector),
    Stopped,
}

/// The capture side of the app: loading, detection, and degraded fallback.
pub struct CaptureSurface {
    state: SurfaceState,
    status: CaptureStatus,
    cell: GestureCell,
}

impl CaptureSurface {
    /// Begin loading in the background.
    pub fn start<L: LandmarkerLoader>(loader: L, request: CaptureRequest, cell: GestureCell) -> Self {
        let (tx, rx) = mpsc::channel();
        let loader: Box<dyn LandmarkerLoader> = Box::new(loader);

        let spawned = thread::Builder::new()
            .name("landmarker-init".into())
            .spawn(move || {
                // Receiver may be gone if the app closed while loading
                let _ = tx.send(loader.load(request));
            });

        match spawned {
            Ok(_) => Self {
                state: SurfaceState::Loading(rx),
                status: CaptureStatus::Loading,
                cell,
            },
            Err(e) => {
                log::warn!("Could not start landmark model loader: {}", e);
                Self {
                    state: SurfaceState::Stopped,
                    status: CaptureStatus::ModelFailed(e.to_string()),
                    cell,
                }
            }
        }
    }

    /// A surface with capture disabled.
    pub fn manual(cell: GestureCell) -> Self {
        log::info!("Capture disabled; manual controls only");
        Self {
            state: SurfaceState::Stopped,
            status: CaptureStatus::ManualOnly,
            cell,
        }
    }

    /// Current status.
    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    /// The shared gesture this surface writes to.
    pub fn cell(&self) -> &GestureCell {
        &self.cell
    }

    /// Advance one frame: finish loading if ready, then run detection.
    ///
    /// Returns the current shared gesture.
    pub fn tick(&mut self, timestamp: Duration) -> Gesture {
        if let SurfaceState::Loading(rx) = &self.state {
            match rx.try_recv() {
                Ok(Ok(landmarker)) => {
                    log::info!("Hand landmark model ready; gesture detection running");
                    self.state = SurfaceState::Running(GestureDetector::new(landmarker, self.cell.clone()));
                    self.status = CaptureStatus::Active;
                }
                Ok(Err(e)) => self.fail(e),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.fail(CaptureError::ModelInit("loader exited without a result".into()))
                }
            }
        }

        if let SurfaceState::Running(detector) = &mut self.state {
            detector.tick(timestamp);
        }

        self.cell.get()
    }

    /// Block until loading finishes or `timeout` passes. Used by tests and
    /// headless runs.
    pub fn wait_ready(&mut self, timeout: Duration) -> &CaptureStatus {
        if let SurfaceState::Loading(rx) = &self.state {
            match rx.recv_timeout(timeout) {
                Ok(Ok(landmarker)) => {
                    self.state = SurfaceState::Running(GestureDetector::new(landmarker, self.cell.clone()));
                    self.status = CaptureStatus::Active;
                }
                Ok(Err(e)) => self.fail(e),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    self.fail(CaptureError::ModelInit("loader exited without a result".into()))
                }
            }
        }
        &self.status
    }

    fn fail(&mut self, error: CaptureError) {
        self.status = if error.is_camera_failure() {
            log::warn!("Camera access denied or failed: {}. Falling back to manual controls", error);
            CaptureStatus::CameraUnavailable(error.to_string())
        } else {
            log::warn!("Hand landmark model failed: {}. Falling back to manual controls", error);
            CaptureStatus::ModelFailed(error.to_string())
        };
        self.state = SurfaceState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::poses;

    const WAIT: Duration = Duration::from_secs(5);

    fn recording(frames: Vec<Option<HandLandmarks>>) -> Recording {
        Recording {
            frame_rate: 10.0,
            frames,
        }
    }

    #[test]
    fn test_replay_picks_frame_by_time() {
        let mut replay = ReplayLandmarker::new(recording(vec![None, Some(poses::fist())]));
        assert_eq!(replay.frame_index(Duration::from_millis(0)), Some(0));
        assert_eq!(replay.frame_index(Duration::from_millis(150)), Some(1));
        // Loops
        assert_eq!(replay.frame_index(Duration::from_millis(250)), Some(0));

        assert_eq!(replay.detect(Duration::from_millis(0)).unwrap(), None);
        assert_eq!(replay.detect(Duration::from_millis(100)).unwrap(), Some(poses::fist()));
    }

    #[test]
    fn test_empty_recording_has_no_hand() {
        let mut replay = ReplayLandmarker::new(Recording::default());
        assert_eq!(replay.detect(Duration::from_secs(1)).unwrap(), None);
    }

    #[test]
    fn test_detector_publishes_changes() {
        let cell = GestureCell::new();
        let replay = ReplayLandmarker::new(recording(vec![Some(poses::open_palm()), Some(poses::fist())]));
        let mut detector = GestureDetector::new(Box::new(replay), cell.clone());

        assert_eq!(detector.tick(Duration::from_millis(0)), Gesture::Palm);
        assert_eq!(cell.get(), Gesture::Palm);
        assert_eq!(detector.tick(Duration::from_millis(100)), Gesture::Fist);
        assert_eq!(cell.get(), Gesture::Fist);
    }

    struct Flaky;

    impl HandLandmarker for Flaky {
        fn detect(&mut self, _timestamp: Duration) -> Result<Option<HandLandmarks>, CaptureError> {
            Err(CaptureError::Unavailable("frame dropped".into()))
        }
    }

    #[test]
    fn test_detection_error_counts_as_no_hand() {
        let cell = GestureCell::new();
        cell.set(Gesture::Palm);
        let mut detector = GestureDetector::new(Box::new(Flaky), cell.clone());
        assert_eq!(detector.tick(Duration::ZERO), Gesture::None);
        assert_eq!(cell.get(), Gesture::None);
    }

    #[test]
    fn test_surface_loads_in_background() {
        let cell = GestureCell::new();
        let frames = recording(vec![Some(poses::open_palm())]);
        let loader = move |_req: CaptureRequest| -> Result<Box<dyn HandLandmarker + Send>, CaptureError> {
            Ok(Box::new(ReplayLandmarker::new(frames)))
        };
        let mut surface = CaptureSurface::start(loader, CaptureRequest::default(), cell.clone());
        assert_eq!(surface.status(), &CaptureStatus::Loading);

        assert_eq!(surface.wait_ready(WAIT), &CaptureStatus::Active);
        assert_eq!(surface.tick(Duration::ZERO), Gesture::Palm);
        assert_eq!(cell.get(), Gesture::Palm);
    }

    #[test]
    fn test_camera_failure_degrades_to_manual() {
        let cell = GestureCell::new();
        let mut surface = CaptureSurface::start(NoCamera, CaptureRequest::default(), cell.clone());
        let status = surface.wait_ready(WAIT).clone();

        assert!(matches!(status, CaptureStatus::CameraUnavailable(_)));
        assert!(status.is_degraded());

        // Manual control still drives the shared gesture
        cell.toggle(Gesture::Palm);
        assert_eq!(surface.tick(Duration::ZERO), Gesture::Palm);
    }

    #[test]
    fn test_model_failure_degrades_to_manual() {
        let cell = GestureCell::new();
        let loader = |_req: CaptureRequest| -> Result<Box<dyn HandLandmarker + Send>, CaptureError> {
            Err(CaptureError::ModelInit("weights missing".into()))
        };
        let mut surface = CaptureSurface::start(loader, CaptureRequest::default(), cell);
        assert!(matches!(surface.wait_ready(WAIT), CaptureStatus::ModelFailed(_)));
    }

    #[test]
    fn test_missing_recording_is_model_failure() {
        let cell = GestureCell::new();
        let loader = ReplayLoader::new("/nonexistent/recording.json");
        let mut surface = CaptureSurface::start(loader, CaptureRequest::default(), cell);
        assert!(matches!(surface.wait_ready(WAIT), CaptureStatus::ModelFailed(_)));
    }

    #[test]
    fn test_manual_surface_never_detects() {
        let cell = GestureCell::new();
        let mut surface = CaptureSurface::manual(cell.clone());
        assert_eq!(surface.status(), &CaptureStatus::ManualOnly);
        assert_eq!(surface.tick(Duration::from_secs(3)), Gesture::None);
    }

    #[test]
    fn test_default_request() {
        let req = CaptureRequest::default();
        assert_eq!((req.width, req.height), (320, 240));
        assert_eq!(req.facing, Facing::User);
        assert_eq!(req.max_hands, 1);
    }
}
