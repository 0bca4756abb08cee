//! Procedural target shapes for particles.
//!
//! Both generators take an RNG so layouts are reproducible when seeded.
//!
//! ```ignore
//! use rand::SeedableRng;
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let tree = TreeShape::default().sample(&mut rng);
//! let burst = sphere_position(&mut rng, 18.0);
//! ```

use crate::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Default angular advance per unit of height for the tree spiral.
pub const SPIRAL_TIGHTNESS: f32 = 12.0;

/// Uniform random f32 in `[min, max)`.
///
/// Returns `min` when the range is empty.
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Cone-shaped spiral shell describing the tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeShape {
    /// Total height of the cone.
    pub height: f32,
    /// Radius at the base of the cone.
    pub base_radius: f32,
    /// Vertical position of the cone's center.
    pub y_offset: f32,
    /// Radians of spiral advance per unit height.
    pub spiral_tightness: f32,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            height: 16.0,
            base_radius: 7.0,
            y_offset: -1.0,
            spiral_tightness: SPIRAL_TIGHTNESS,
        }
    }
}

impl TreeShape {
    /// Sample a point on the tree.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        tree_position_with(rng, self.height, self.base_radius, self.y_offset, self.spiral_tightness)
    }

    /// Maximum planar radius allowed at a world-space height.
    pub fn radius_at(&self, world_y: f32) -> f32 {
        let local = world_y - self.y_offset + self.height / 2.0;
        (1.0 - local / self.height) * self.base_radius
    }
}

/// Random point on a cone spiral of the given height and base radius,
/// centered vertically at `y_offset`.
pub fn tree_position<R: Rng + ?Sized>(rng: &mut R, height: f32, base_radius: f32, y_offset: f32) -> Vec3 {
    tree_position_with(rng, height, base_radius, y_offset, SPIRAL_TIGHTNESS)
}

fn tree_position_with<R: Rng + ?Sized>(
    rng: &mut R,
    height: f32,
    base_radius: f32,
    y_offset: f32,
    spiral_tightness: f32,
) -> Vec3 {
    let y = rng.gen::<f32>() * height;

    // Radius shrinks linearly toward the apex
    let radius_at_y = (1.0 - y / height) * base_radius;

    // sqrt for an even areal distribution across the disc
    let r = radius_at_y * rng.gen::<f32>().sqrt();

    let angle = y * spiral_tightness + rng.gen::<f32>() * TAU;

    Vec3::new(r * angle.cos(), y - height / 2.0 + y_offset, r * angle.sin())
}

/// Random point inside a sphere of given radius, centered at origin.
///
/// Distribution is uniform throughout the volume.
pub fn sphere_position<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let u: f32 = rng.gen();
    let v: f32 = rng.gen();
    let theta = TAU * u;
    // acos keeps points from clustering at the poles
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();

    // Cube root for uniform volume distribution
    let r = rng.gen::<f32>().cbrt() * radius;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_tree_position_within_cone() {
        let mut rng = StdRng::seed_from_u64(1);
        let shape = TreeShape::default();

        for _ in 0..10_000 {
            let p = shape.sample(&mut rng);
            let half = shape.height / 2.0;
            assert!(p.y >= -half + shape.y_offset - EPS);
            assert!(p.y <= half + shape.y_offset + EPS);

            let planar = (p.x * p.x + p.z * p.z).sqrt();
            assert!(planar <= shape.radius_at(p.y) + EPS, "{planar} exceeds cone at y={}", p.y);
        }
    }

    #[test]
    fn test_tree_position_other_dimensions() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..2_000 {
            let p = tree_position(&mut rng, 4.0, 1.5, 3.0);
            assert!(p.y >= 1.0 - EPS && p.y <= 5.0 + EPS);
            let local = p.y - 3.0 + 2.0;
            let max_r = (1.0 - local / 4.0) * 1.5;
            assert!((p.x * p.x + p.z * p.z).sqrt() <= max_r + EPS);
        }
    }

    #[test]
    fn test_sphere_position_inside_radius() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10_000 {
            let p = sphere_position(&mut rng, 18.0);
            assert!(p.length() <= 18.0 + EPS);
        }
    }

    #[test]
    fn test_sphere_volume_density_is_uniform() {
        // Shell boundaries at r * cbrt(k/4) split the ball into 4 equal volumes
        let mut rng = StdRng::seed_from_u64(4);
        let radius = 1.0;
        let samples = 40_000;
        let bounds: Vec<f32> = (1..=4).map(|k| (k as f32 / 4.0).cbrt() * radius).collect();
        let mut counts = [0usize; 4];

        for _ in 0..samples {
            let len = sphere_position(&mut rng, radius).length();
            let shell = bounds.iter().position(|&b| len <= b).unwrap_or(3);
            counts[shell] += 1;
        }

        let expected = samples as f32 / 4.0;
        for count in counts {
            let rel = (count as f32 - expected).abs() / expected;
            assert!(rel < 0.05, "shell count {count} deviates from {expected}");
        }
    }

    #[test]
    fn test_sphere_no_pole_clustering() {
        // Uniform on the sphere means z/r is uniform in [-1, 1]
        let mut rng = StdRng::seed_from_u64(5);
        let samples = 20_000;
        let mut upper_cap = 0;
        for _ in 0..samples {
            let p = sphere_position(&mut rng, 1.0);
            if p.length() > 1e-6 && p.z / p.length() > 0.5 {
                upper_cap += 1;
            }
        }
        let frac = upper_cap as f32 / samples as f32;
        assert!((frac - 0.25).abs() < 0.02, "cap fraction {frac}");
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..1_000 {
            let v = random_range(&mut rng, 0.04, 0.15);
            assert!((0.04..0.15).contains(&v));
        }
        assert_eq!(random_range(&mut rng, 2.0, 2.0), 2.0);
    }
}
