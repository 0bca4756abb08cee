//! # Gesture Tree
//!
//! A particle Christmas tree that explodes into a sphere when you open your
//! hand, and gathers back when you close it.
//!
//! Every particle has two fixed homes, one on a spiralling cone and one
//! inside a sphere. A single smoothed scalar, the *mix*, blends between
//! them each frame. The mix chases a target picked by the current hand
//! gesture.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gesture_tree::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     Visualization::new(VisualizationConfig::default())
//!         .with_recording("hands.json")
//!         .run()
//! }
//! ```
//!
//! ## Gestures
//!
//! | Gesture | Fingers extended | Effect |
//! |---------|------------------|--------|
//! | [`Gesture::Fist`] | none | tree (mix 0), star shown |
//! | [`Gesture::Pointing`] | index only, tip raised | tree |
//! | [`Gesture::Palm`] | all four | explode (mix 1), star hidden |
//! | [`Gesture::None`] | anything else, or no hand | tree |
//!
//! Press `T` / `E` to force the tree or the explosion when no camera is
//! available. Pressing the same key again releases it.
//!
//! ## Headless use
//!
//! [`Scene`] runs detection and animation without a window:
//!
//! ```ignore
//! let mut scene = Visualization::new(config).into_scene()?;
//! scene.frame(0.016);
//! for instance in scene.instances() { /* ... */ }
//! ```

mod app;
pub mod animation;
pub mod capture;
pub mod config;
pub mod control;
pub mod error;
pub mod gesture;
mod gpu;
pub mod input;
pub mod mix;
pub mod particle;
pub mod shapes;
pub mod time;

pub use animation::{Animator, ParticleInstance, StarInstance};
pub use app::{Scene, Visualization};
pub use capture::{CaptureSurface, HandLandmarker, LandmarkerLoader};
pub use config::VisualizationConfig;
pub use control::{CaptureStatus, GestureCell, ManualControl};
pub use error::{CaptureError, ConfigError, GpuError, RunError};
pub use gesture::{classify, Gesture, HandLandmarks};
pub use glam::{Vec2, Vec3};
pub use gpu::Camera;
pub use mix::MixDriver;
pub use particle::Particle;

/// Common imports.
pub mod prelude {
    pub use crate::animation::{Animator, ParticleInstance, StarInstance};
    pub use crate::capture::{
        CaptureRequest, CaptureSurface, HandLandmarker, LandmarkerLoader, Recording, ReplayLoader,
    };
    pub use crate::config::{CameraConfig, CaptureConfig, VisualizationConfig};
    pub use crate::control::{CaptureStatus, GestureCell, ManualControl};
    pub use crate::error::{CaptureError, ConfigError, RunError};
    pub use crate::gesture::{classify, Gesture, HandLandmarks};
    pub use crate::shapes::TreeShape;
    pub use crate::time::FrameClock;
    pub use crate::{Scene, Visualization};
    pub use crate::{Vec2, Vec3};
}
