//! Vertex definitions shared by every mesh in the scene.
//!
//! This module provides the [`Vertex`] struct, which describes the layout of vertex data for the
//! renderer, and the [`ParticleInstance`] layout used by the particle overlay.

/// Vertex data for lit, textured geometry.
///
/// Each vertex contains:
/// - `position`: 3D position in model space.
/// - `normal`: surface normal in model space.
/// - `tex_coords`: texture coordinates (repeat-wrapped).
/// - `color`: RGB tint multiplied into the sampled texel.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// 3D position in model space.
    pub position: [f32; 3],
    /// Surface normal in model space.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub tex_coords: [f32; 2],
    /// RGB tint.
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x3
    ];

    /// White vertex with the given position, normal and texture coordinates.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            color: [1.0, 1.0, 1.0],
        }
    }

    /// Returns the vertex buffer layout for use in a wgpu pipeline.
    ///
    /// This describes the memory layout of [`Vertex`] for the GPU.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-instance data for one particle billboard.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    /// World-space centre of the billboard.
    pub position: [f32; 3],
    /// Remaining life in `[0, 1]`, used to fade the sprite.
    pub life: f32,
}

impl ParticleInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32
    ];

    /// Instance-rate layout; the quad corners come from `vertex_index` in the shader.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The GPU stride must match the Rust layout with no padding.
    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 11 * 4);
        assert_eq!(Vertex::desc().array_stride, 44);
        assert_eq!(Vertex::desc().attributes[3].offset, 32);
        assert_eq!(ParticleInstance::desc().array_stride, 16);
    }
}
