use bytemuck::{Pod, Zeroable};

use crate::animation::{ParticleInstance, StarInstance};

pub const PARTICLE_SHADER: &str = include_str!("particles.wgsl");

pub const SHAPE_PARTICLE: u32 = 0;
pub const SHAPE_STAR: u32 = 1;

/// Per-instance vertex data, one per particle plus one for the star.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 3],
    pub spin: f32,
    pub wobble: f32,
    pub shape: u32,
}

impl InstanceRaw {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32,   // scale
        2 => Float32x3, // color
        3 => Float32,   // spin
        4 => Float32,   // wobble
        5 => Uint32,    // shape
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&ParticleInstance> for InstanceRaw {
    fn from(p: &ParticleInstance) -> Self {
        Self {
            position: p.position.to_array(),
            scale: p.scale,
            color: p.color.to_array(),
            spin: 0.0,
            wobble: 0.0,
            shape: SHAPE_PARTICLE,
        }
    }
}

impl InstanceRaw {
    /// Gold star ornament.
    pub fn star(star: &StarInstance) -> Self {
        Self {
            position: star.position.to_array(),
            scale: star.scale,
            color: crate::particle::hex(0xffd700).to_array(),
            spin: star.spin,
            wobble: star.wobble,
            shape: SHAPE_STAR,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// time, vignette offset, vignette darkness, unused
    pub params: [f32; 4],
    /// width, height, unused, unused
    pub viewport: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_has_no_padding() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 40);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }
}
