//! Particle overlay pass.
//!
//! Each live particle becomes one camera-facing quad. The quad corners are generated from
//! `vertex_index` in the vertex shader, so the only vertex data is one
//! [`ParticleInstance`] per particle. Particles blend like the glass cubes and test but
//! never write depth.

use crate::game::particles::MAX_PARTICLES;
use crate::renderer::pipeline_builder::{PipelineBuilder, depth_state};
use crate::renderer::shader::ShaderPair;
use crate::renderer::vertex::ParticleInstance;

/// Renders [`ParticleInstance`]s as billboards.
pub struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
}

impl ParticleRenderer {
    /// Creates the pipeline and an instance buffer sized for [`MAX_PARTICLES`].
    ///
    /// # Arguments
    /// * `frame_layout` - Layout of the per-frame uniforms bound at group 0
    /// * `sample_count` - MSAA samples of the scene pass
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
        shaders: &ShaderPair,
        sample_count: u32,
    ) -> Self {
        let pipeline = PipelineBuilder::new(device, surface_format)
            .with_label("Particle Pipeline")
            .with_shader_pair(shaders)
            .with_vertex_buffer(ParticleInstance::desc())
            .with_bind_group_layout(frame_layout)
            .with_alpha_blending()
            .with_no_culling()
            .with_depth_stencil(depth_state(false))
            .with_sample_count(sample_count)
            .build();

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Instance Buffer"),
            size: (MAX_PARTICLES * std::mem::size_of::<ParticleInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            instance_buffer,
            instance_count: 0,
        }
    }

    /// Uploads this frame's instances. Anything past [`MAX_PARTICLES`] is dropped.
    pub fn update(&mut self, queue: &wgpu::Queue, instances: &[ParticleInstance]) {
        let instances = &instances[..instances.len().min(MAX_PARTICLES)];
        self.instance_count = instances.len() as u32;
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    /// Draws the uploaded instances. The frame bind group must already be set at group 0.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.instance_count);
    }
}
