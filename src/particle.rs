//! Particle records and the one-time generation of the particle set.

use crate::config::VisualizationConfig;
use crate::shapes::{random_range, sphere_position};
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Tree greens; chosen 70% of the time.
pub const GREENS: [Vec3; 4] = [
    hex(0x00ff00),
    hex(0x00ff00),
    hex(0x2ecc71),
    hex(0x006400),
];

/// Red, gold and white ornaments.
pub const ORNAMENTS: [Vec3; 3] = [hex(0xff0000), hex(0xffd700), hex(0xffffff)];

/// Probability of drawing a green rather than an ornament color.
pub const GREEN_WEIGHT: f32 = 0.7;

/// Convert a packed `0xRRGGBB` color to RGB in 0.0-1.0.
pub const fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    )
}

/// A single particle. Never mutated after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Target position in the tree arrangement.
    pub tree_position: Vec3,
    /// Target position in the exploded arrangement.
    pub explosion_position: Vec3,
    /// Base RGB color (0.0-1.0).
    pub color: Vec3,
    /// Base billboard size.
    pub size: f32,
    /// Oscillation phase in radians.
    pub phase: f32,
    /// Float oscillation speed.
    pub speed: f32,
}

/// Pick a palette color, weighted toward greens.
pub fn palette_color<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    if rng.gen::<f32>() < GREEN_WEIGHT {
        GREENS[rng.gen_range(0..GREENS.len())]
    } else {
        ORNAMENTS[rng.gen_range(0..ORNAMENTS.len())]
    }
}

/// Generate one particle from the configured shapes.
pub fn spawn_particle<R: Rng + ?Sized>(rng: &mut R, config: &VisualizationConfig) -> Particle {
    let tree_position = config.tree.sample(rng);
    let explosion_position = sphere_position(rng, config.explosion_radius);
    let color = palette_color(rng);

    Particle {
        tree_position,
        explosion_position,
        color,
        size: random_range(rng, config.size_range[0], config.size_range[1]),
        speed: random_range(rng, config.speed_range[0], config.speed_range[1]),
        phase: rng.gen::<f32>() * TAU,
    }
}

/// Generate the full particle set.
///
/// With `config.seed` set, the layout is identical across runs.
pub fn generate_particles(config: &VisualizationConfig) -> Vec<Particle> {
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    (0..config.particle_count)
        .map(|_| spawn_particle(&mut rng, config))
        .collect()
}
