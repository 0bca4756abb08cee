//! Error types for gesture-tree.
//!
//! Covers GPU initialization, landmark capture, configuration loading and
//! the top-level event loop. Capture errors are always recoverable: the
//! visualization falls back to manual control.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture formats.
    #[error("GPU surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors raised while acquiring camera frames or running hand inference.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The user or platform refused camera access.
    #[error("Camera access denied")]
    PermissionDenied,
    /// No camera device, or the requested stream could not be opened.
    #[error("Camera unavailable: {0}")]
    Unavailable(String),
    /// The hand landmark model failed to load.
    #[error("Hand landmark model failed to initialize: {0}")]
    ModelInit(String),
    /// Failed to read a landmark recording.
    #[error("Failed to read landmark recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A landmark recording is not valid JSON for the expected layout.
    #[error("Malformed landmark recording: {0}")]
    Parse(#[from] serde_json::Error),
    /// A detected hand had an invalid landmark set.
    #[error(transparent)]
    Landmarks(#[from] LandmarkError),
}

/// Errors constructing a hand landmark set.
#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    /// Hands always carry exactly 21 landmarks.
    #[error("Expected 21 hand landmarks, got {0}")]
    WrongCount(usize),
    /// A coordinate was NaN or infinite.
    #[error("Landmark {0} has a non-finite coordinate")]
    NonFinite(usize),
}

/// Errors loading or validating a [`VisualizationConfig`](crate::VisualizationConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid config JSON.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors that can occur when running the visualization.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create event loop.
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The configuration was rejected.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
