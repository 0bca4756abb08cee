//! Per-frame particle and star transforms.
//!
//! Everything here is a pure function of `(time, particle, mix)`; the only
//! state that evolves across frames is the [`MixDriver`] inside [`Animator`].

use crate::gesture::Gesture;
use crate::mix::MixDriver;
use crate::particle::Particle;
use crate::Vec3;

/// Tree rotation speed (rad/s) when fully assembled.
pub const TREE_ROTATION_SPEED: f32 = 0.3;
/// Vertical float amplitude.
pub const FLOAT_AMPLITUDE: f32 = 0.1;
/// Twinkle frequency (rad/s).
pub const TWINKLE_RATE: f32 = 5.0;
/// Star spin rate about Y (rad/s).
pub const STAR_SPIN_RATE: f32 = 1.5;
/// Star wobble amplitude about Z (radians).
pub const STAR_WOBBLE: f32 = 0.1;

/// Rendered state of one particle for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleInstance {
    pub position: Vec3,
    pub scale: f32,
    pub color: Vec3,
}

/// Rendered state of the star ornament for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarInstance {
    pub position: Vec3,
    pub scale: f32,
    /// Rotation about the Y axis in radians.
    pub spin: f32,
    /// Rotation about the Z axis in radians.
    pub wobble: f32,
}

/// Position between the two arrangements, before any modulation.
#[inline]
pub fn blended_position(particle: &Particle, mix: f32) -> Vec3 {
    particle.tree_position.lerp(particle.explosion_position, mix)
}

/// Vertical float offset for a particle at `time`.
#[inline]
pub fn float_offset(particle: &Particle, time: f32) -> f32 {
    (time * particle.speed * 5.0 + particle.phase).sin() * FLOAT_AMPLITUDE
}

/// Twinkle multiplier in [0.5, 1.5].
#[inline]
pub fn twinkle(particle: &Particle, time: f32) -> f32 {
    (time * TWINKLE_RATE + particle.phase).sin() * 0.5 + 1.0
}

/// Tree rotation angle about Y; slows to zero as the explosion completes.
#[inline]
pub fn rotation_angle(time: f32, mix: f32) -> f32 {
    time * TREE_ROTATION_SPEED * (1.0 - mix)
}

/// Color whitened toward white once the mix passes one half.
#[inline]
pub fn flash_color(color: Vec3, mix: f32) -> Vec3 {
    if mix > 0.5 {
        color.lerp(Vec3::ONE, mix - 0.5)
    } else {
        color
    }
}

/// Full transform for one particle.
pub fn particle_transform(particle: &Particle, time: f32, mix: f32) -> ParticleInstance {
    let base = blended_position(particle, mix);

    let angle = rotation_angle(time, mix);
    let (sin_r, cos_r) = angle.sin_cos();
    let x = base.x * cos_r - base.z * sin_r;
    let z = base.x * sin_r + base.z * cos_r;

    ParticleInstance {
        position: Vec3::new(x, base.y + float_offset(particle, time), z),
        scale: particle.size * twinkle(particle, time),
        color: flash_color(particle.color, mix),
    }
}

/// Star transform at `position` for a given smoothed scale.
pub fn star_transform(position: Vec3, time: f32, scale: f32) -> StarInstance {
    StarInstance {
        position,
        scale,
        spin: time * STAR_SPIN_RATE,
        wobble: time.sin() * STAR_WOBBLE,
    }
}

/// Drives the per-frame animation: owns the mix state, reads the particles.
#[derive(Clone, Debug)]
pub struct Animator {
    driver: MixDriver,
    star_position: Vec3,
}

impl Animator {
    pub fn new(driver: MixDriver, star_position: Vec3) -> Self {
        Self {
            driver,
            star_position,
        }
    }

    /// Current mix factor.
    pub fn mix(&self) -> f32 {
        self.driver.mix()
    }

    /// Current star scale.
    pub fn star_scale(&self) -> f32 {
        self.driver.star_scale()
    }

    /// Step the mix for `gesture`, then write every particle's transform
    /// into `out` (cleared first) and return the star.
    pub fn frame(
        &mut self,
        gesture: Gesture,
        time: f32,
        particles: &[Particle],
        out: &mut Vec<ParticleInstance>,
    ) -> StarInstance {
        let mix = self.driver.step(gesture);

        out.clear();
        out.extend(particles.iter().map(|p| particle_transform(p, time, mix)));

        star_transform(self.star_position, time, self.driver.star_scale())
    }
}
