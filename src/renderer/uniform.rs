//! Uniform buffer layouts for the lit scene shaders.
//!
//! This module provides [`FrameUniforms`], written once per frame with the camera and every
//! light, and [`ModelUniform`], one model matrix per drawable addressed with a dynamic
//! offset. Every `vec3` travels as a `[f32; 4]` so the Rust layout matches WGSL's uniform
//! alignment rules without manual padding fields in the shaders.

use crate::game::lighting::{DirectionalLight, Lighting, PointLight, SpotLight};
use crate::math::mat::Mat4;
use crate::math::vec::Vec3;

/// GPU form of [`DirectionalLight`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    /// Direction the light travels.
    pub direction: [f32; 4],
    /// Ambient colour.
    pub ambient: [f32; 4],
    /// Diffuse colour.
    pub diffuse: [f32; 4],
    /// Specular colour.
    pub specular: [f32; 4],
}

impl From<&DirectionalLight> for DirectionalLightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: light.direction.extend(0.0),
            ambient: light.ambient.extend(0.0),
            diffuse: light.diffuse.extend(0.0),
            specular: light.specular.extend(0.0),
        }
    }
}

/// GPU form of [`PointLight`]. `attenuation` holds constant, linear and quadratic terms.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    /// World position, `w = 1`.
    pub position: [f32; 4],
    /// Ambient colour.
    pub ambient: [f32; 4],
    /// Diffuse colour.
    pub diffuse: [f32; 4],
    /// Specular colour.
    pub specular: [f32; 4],
    /// Constant, linear and quadratic falloff.
    pub attenuation: [f32; 4],
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.extend(1.0),
            ambient: light.ambient.extend(0.0),
            diffuse: light.diffuse.extend(0.0),
            specular: light.specular.extend(0.0),
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
        }
    }
}

/// GPU form of [`SpotLight`]. `cone` holds the inner and outer cutoff cosines.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniform {
    /// World position, `w = 1`.
    pub position: [f32; 4],
    /// Direction the cone points.
    pub direction: [f32; 4],
    /// Ambient colour.
    pub ambient: [f32; 4],
    /// Diffuse colour.
    pub diffuse: [f32; 4],
    /// Specular colour.
    pub specular: [f32; 4],
    /// Constant, linear and quadratic falloff.
    pub attenuation: [f32; 4],
    /// Inner and outer cutoff cosines.
    pub cone: [f32; 4],
}

impl From<&SpotLight> for SpotLightUniform {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: light.position.extend(1.0),
            direction: light.direction.extend(0.0),
            ambient: light.ambient.extend(0.0),
            diffuse: light.diffuse.extend(0.0),
            specular: light.specular.extend(0.0),
            attenuation: [light.constant, light.linear, light.quadratic, 0.0],
            cone: [light.cutoff, light.outer_cutoff, 0.0, 0.0],
        }
    }
}

/// Per-frame uniforms shared by every draw call. Bound at group 0, binding 0.
///
/// `view_pos.w` carries the specular shininess.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// World to camera.
    pub view: [[f32; 4]; 4],
    /// Camera to clip.
    pub proj: [[f32; 4]; 4],
    /// Camera position; `w` is the shininess.
    pub view_pos: [f32; 4],
    /// The sun.
    pub sun: DirectionalLightUniform,
    /// Coloured lights around the maze.
    pub point_lights: [PointLightUniform; 3],
    /// Flashlight attached to the camera.
    pub spot: SpotLightUniform,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::identity().0,
            proj: Mat4::identity().0,
            view_pos: [0.0; 4],
            sun: DirectionalLightUniform::default(),
            point_lights: [PointLightUniform::default(); 3],
            spot: SpotLightUniform::default(),
        }
    }
}

impl FrameUniforms {
    /// Packs the camera matrices and the current lights.
    ///
    /// # Arguments
    /// * `view` - World to camera transform
    /// * `proj` - Camera to clip transform
    /// * `eye` - Camera position, used for specular highlights
    /// * `lighting` - Every light in the scene
    /// * `shininess` - Specular exponent
    pub fn new(view: Mat4, proj: Mat4, eye: Vec3, lighting: &Lighting, shininess: f32) -> Self {
        Self {
            view: view.0,
            proj: proj.0,
            view_pos: eye.extend(shininess),
            sun: (&lighting.sun).into(),
            point_lights: [
                (&lighting.point_lights[0]).into(),
                (&lighting.point_lights[1]).into(),
                (&lighting.point_lights[2]).into(),
            ],
            spot: (&lighting.spot).into(),
        }
    }

    /// Returns the raw bytes of the uniform struct for uploading to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// One model matrix, padded to the dynamic offset alignment every backend accepts.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    /// Object to world.
    pub model: [[f32; 4]; 4],
    _padding: [[f32; 4]; 12],
}

impl ModelUniform {
    /// Distance between consecutive elements in the model buffer.
    pub const STRIDE: u64 = std::mem::size_of::<ModelUniform>() as u64;

    /// Bytes the shader actually reads from each element.
    pub const BINDING_SIZE: u64 = std::mem::size_of::<[[f32; 4]; 4]>() as u64;

    /// Wraps a model matrix with zeroed padding.
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.0,
            _padding: [[0.0; 4]; 12],
        }
    }

    /// Dynamic offset of draw slot `slot`.
    pub fn offset(slot: usize) -> u32 {
        (slot as u64 * Self::STRIDE) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sizes must stay multiples of 16 so WGSL sees the same layout.
    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<DirectionalLightUniform>(), 64);
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 80);
        assert_eq!(std::mem::size_of::<SpotLightUniform>(), 112);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 128 + 16 + 64 + 240 + 112);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(ModelUniform::STRIDE, 256);
        assert_eq!(ModelUniform::offset(3), 768);
    }

    #[test]
    fn test_frame_packs_lighting() {
        let lighting = Lighting::new();
        let eye = Vec3::new(1.5, -59.0, 1.5);
        let frame = FrameUniforms::new(Mat4::identity(), Mat4::identity(), eye, &lighting, 32.0);

        assert_eq!(frame.view_pos, [1.5, -59.0, 1.5, 32.0]);
        assert_eq!(frame.point_lights[0].position, [4.0, -60.0, 2.0, 1.0]);
        assert_eq!(frame.point_lights[2].attenuation, [1.0, 0.045, 0.0075, 0.0]);
        assert_eq!(frame.spot.cone[0], lighting.spot.cutoff);
        assert_eq!(frame.as_bytes().len(), std::mem::size_of::<FrameUniforms>());
    }
}
