//! Visualization configuration.
//!
//! All values have defaults matching the stock scene, so a config file only
//! needs the fields it changes:
//!
//! ```json
//! { "particle_count": 5000, "tree": { "height": 20.0 } }
//! ```

use crate::error::ConfigError;
use crate::mix::{MIX_SMOOTHING, STAR_SMOOTHING};
use crate::shapes::TreeShape;
use crate::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Orbit camera and auto-rotate settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial distance from the origin along +Z.
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Closest zoom.
    pub min_distance: f32,
    /// Farthest zoom.
    pub max_distance: f32,
    /// Auto-rotate speed while the tree is shown; 1.0 is one turn per minute.
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 25.0,
            fov_degrees: 45.0,
            min_distance: 10.0,
            max_distance: 40.0,
            auto_rotate_speed: 0.8,
        }
    }
}

/// Camera capture request and optional landmark recording.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Requested frame width in pixels.
    pub width: u32,
    /// Requested frame height in pixels.
    pub height: u32,
    /// Landmark recording to replay instead of a live camera.
    pub recording: Option<PathBuf>,
    /// Skip capture entirely and start in manual mode.
    pub manual_only: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            recording: None,
            manual_only: false,
        }
    }
}

fn default_star_position() -> Vec3 {
    Vec3::new(0.0, 8.0, 0.0)
}

/// Complete visualization configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisualizationConfig {
    pub particle_count: u32,
    /// Fixed RNG seed for a reproducible layout.
    pub seed: Option<u64>,
    pub tree: TreeShape,
    pub explosion_radius: f32,
    /// Particle size range `[min, max)`.
    pub size_range: [f32; 2],
    /// Float speed range `[min, max)`.
    pub speed_range: [f32; 2],
    /// Per-frame smoothing of the tree/explosion mix.
    pub mix_smoothing: f32,
    /// Per-frame smoothing of the star scale.
    pub star_smoothing: f32,
    #[serde(default = "default_star_position")]
    pub star_position: Vec3,
    pub camera: CameraConfig,
    pub capture: CaptureConfig,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            particle_count: 3500,
            seed: None,
            tree: TreeShape::default(),
            explosion_radius: 18.0,
            size_range: [0.04, 0.15],
            speed_range: [0.01, 0.05],
            mix_smoothing: MIX_SMOOTHING,
            star_smoothing: STAR_SMOOTHING,
            star_position: default_star_position(),
            camera: CameraConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl VisualizationConfig {
    /// Load and validate a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("tree.height", self.tree.height),
            ("tree.base_radius", self.tree.base_radius),
            ("tree.y_offset", self.tree.y_offset),
            ("tree.spiral_tightness", self.tree.spiral_tightness),
            ("explosion_radius", self.explosion_radius),
            ("size_range", self.size_range[1]),
            ("speed_range", self.speed_range[1]),
            ("camera.distance", self.camera.distance),
            ("camera.max_distance", self.camera.max_distance),
            ("camera.auto_rotate_speed", self.camera.auto_rotate_speed),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }
        if !self.star_position.is_finite() {
            return Err(invalid("star_position", "must be finite"));
        }
        if !(self.tree.height > 0.0) {
            return Err(invalid("tree.height", "must be positive"));
        }
        if !(self.tree.base_radius > 0.0) {
            return Err(invalid("tree.base_radius", "must be positive"));
        }
        if !(self.explosion_radius > 0.0) {
            return Err(invalid("explosion_radius", "must be positive"));
        }
        for (field, [min, max]) in [("size_range", self.size_range), ("speed_range", self.speed_range)] {
            if !(min >= 0.0 && min <= max) {
                return Err(invalid(field, format!("expected 0 <= min <= max, got [{min}, {max}]")));
            }
        }
        for (field, factor) in [("mix_smoothing", self.mix_smoothing), ("star_smoothing", self.star_smoothing)] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(invalid(field, format!("must be in (0, 1], got {factor}")));
            }
        }
        let cam = &self.camera;
        if !(cam.min_distance > 0.0 && cam.min_distance <= cam.max_distance) {
            return Err(invalid("camera.min_distance", "must be positive and not exceed max_distance"));
        }
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(invalid("capture", "frame size must be non-zero"));
        }
        Ok(())
    }
}
