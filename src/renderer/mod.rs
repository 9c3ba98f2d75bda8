//! Main renderer module.
//!
//! This module contains submodules for vertex and uniform layouts, GPU meshes and textures,
//! pipeline construction, and the [`wgpu_lib::RenderContext`] that draws the scene each frame.

/// GPU meshes and their CPU-side data.
pub mod mesh;
/// Particle billboard pass.
pub mod particle_renderer;
/// Pipeline building utilities for WGPU.
pub mod pipeline_builder;
/// WGSL source loading.
pub mod shader;
/// Mipmapped GPU textures.
pub mod texture;
/// Uniform buffer layouts.
pub mod uniform;
/// Vertex layouts.
pub mod vertex;
/// Core WGPU render context.
pub mod wgpu_lib;
