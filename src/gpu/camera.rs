//! Orbit camera with zoom limits and auto-rotate.

use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

use crate::config::CameraConfig;

/// Pitch stays just short of straight up/down.
const PITCH_LIMIT: f32 = 1.5;

/// Orbit camera looking at the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around. Panning is disabled.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    min_distance: f32,
    max_distance: f32,
    auto_rotate_speed: f32,
}

impl Camera {
    /// Camera on +Z at the configured distance, looking at the origin.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: config.distance.max(config.min_distance).min(config.max_distance),
            target: Vec3::ZERO,
            fov: config.fov_degrees.to_radians(),
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            auto_rotate_speed: config.auto_rotate_speed,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Projection for a viewport aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, 0.1, 200.0)
    }

    /// Orbit by a mouse drag in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * 0.005;
        self.pitch = (self.pitch + dy * 0.005).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Zoom by scroll lines; clamped to the configured range.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.8).clamp(self.min_distance, self.max_distance);
    }

    /// Spin around the target for `dt` seconds. One unit of speed is one
    /// turn per minute.
    pub fn auto_rotate(&mut self, dt: f32) {
        self.yaw += TAU / 60.0 * self.auto_rotate_speed * dt;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position() {
        let camera = Camera::default();
        assert!((camera.position() - Vec3::new(0.0, 0.0, 25.0)).length() < 1e-5);
        assert!((camera.fov - 45f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut camera = Camera::default();
        camera.zoom(100.0);
        assert_eq!(camera.distance, 10.0);
        camera.zoom(-100.0);
        assert_eq!(camera.distance, 40.0);
    }

    #[test]
    fn test_auto_rotate_rate() {
        let mut camera = Camera::default();
        camera.auto_rotate(60.0);
        // 0.8 turns in a minute
        assert!((camera.yaw - 0.8 * TAU).abs() < 1e-4);
    }

    #[test]
    fn test_inverted_limits_do_not_panic() {
        let config = CameraConfig {
            min_distance: 50.0,
            ..CameraConfig::default()
        };
        let camera = Camera::new(&config);
        assert_eq!(camera.distance, 40.0);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::default();
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
    }
}
