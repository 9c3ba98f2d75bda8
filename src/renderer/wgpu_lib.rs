//! WGPU render context for the scene.
//!
//! This module provides [`RenderContext`], which owns the device, the surface and every GPU
//! resource the scene needs: pipelines, depth and multisample targets, the per-frame and
//! per-model uniform buffers, and the arenas of uploaded meshes and textures.
//!
//! # Frame structure
//! Each frame is a single render pass:
//! 1. Opaque drawables, depth write on, no blending
//! 2. Transparent drawables back to front, alpha blending, depth test only
//! 3. Particle billboards in the same blended state
//!
//! Pipeline objects carry the whole render state, so nothing leaks between the stages.
//!
//! # Usage
//! Create a [`RenderContext`] via [`RenderContext::new`], upload assets with
//! [`RenderContext::upload_mesh`] and [`RenderContext::load_texture`], then call
//! [`RenderContext::render_frame`] once per frame.

use crate::assets::texture::load_texture_image;
use crate::renderer::mesh::{GpuMesh, MeshData};
use crate::renderer::particle_renderer::ParticleRenderer;
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, DEPTH_FORMAT, PipelineBuilder, create_uniform_buffer, depth_state,
};
use crate::renderer::shader::ShaderPair;
use crate::renderer::texture::GpuTexture;
use crate::renderer::uniform::{FrameUniforms, ModelUniform};
use crate::renderer::vertex::{ParticleInstance, Vertex};
use crate::scene::{DrawOrder, Drawable, DrawableKey, MeshKey, Scene, TextureKey};
use bytemuck::Zeroable;
use slotmap::SlotMap;
use std::path::Path;

/// Background colour of every frame.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// Model slots allocated up front; the buffer doubles when a scene needs more.
const INITIAL_MODEL_CAPACITY: usize = 1024;

/// Renderer setup errors. All of them are fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum RendererError {
    /// No adapter can present to the window surface.
    #[error("no suitable graphics adapter found")]
    NoAdapter,

    /// The adapter refused the device request.
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The window cannot back a surface.
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// The surface supports no texture format at all.
    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

/// Shader programs the renderer compiles at startup.
pub struct ShaderSet {
    /// Lit, textured geometry.
    pub lit: ShaderPair,
    /// Particle billboards.
    pub particle: ShaderPair,
}

/// Every GPU resource needed to draw a [`Scene`].
pub struct RenderContext {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    /// The surface configuration (format, size, present mode).
    pub surface_config: wgpu::SurfaceConfiguration,
    /// The WGPU device for resource creation.
    pub device: wgpu::Device,
    /// The WGPU queue for submitting commands.
    pub queue: wgpu::Queue,
    sample_count: u32,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    textures: SlotMap<TextureKey, GpuTexture>,
    meshes: SlotMap<MeshKey, GpuMesh>,
    fallback_texture: GpuTexture,
    particles: ParticleRenderer,
}

impl RenderContext {
    /// Initializes the device and every pipeline.
    ///
    /// # Arguments
    /// * `instance` - The WGPU instance the surface was created from
    /// * `surface` - Window surface to present to
    /// * `size` - Initial surface size in physical pixels
    /// * `sample_count` - Requested MSAA samples; `None` or an unsupported count renders
    ///   without multisampling
    /// * `shaders` - Already loaded shader sources
    ///
    /// # Errors
    /// [`RendererError`] if no adapter, device or surface format is available.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        size: (u32, u32),
        sample_count: Option<u32>,
        shaders: &ShaderSet,
    ) -> Result<Self, RendererError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .ok_or(RendererError::NoAdapter)?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size)?;
        surface.configure(&device, &surface_config);

        let sample_count = match sample_count {
            Some(count)
                if adapter
                    .get_texture_format_features(surface_config.format)
                    .flags
                    .sample_count_supported(count) =>
            {
                log::info!("MSAA enabled with {count} samples");
                count
            }
            Some(count) => {
                log::warn!("{count}x MSAA not supported by this adapter, disabling");
                1
            }
            None => 1,
        };

        let frame_layout = BindGroupLayoutBuilder::new(&device)
            .with_label("Frame Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT)
            .build();
        let model_layout = BindGroupLayoutBuilder::new(&device)
            .with_label("Model Bind Group Layout")
            .with_dynamic_uniform_buffer(0, wgpu::ShaderStages::VERTEX, ModelUniform::BINDING_SIZE)
            .build();
        let texture_layout = BindGroupLayoutBuilder::new(&device)
            .with_label("Texture Bind Group Layout")
            .with_texture(0, wgpu::ShaderStages::FRAGMENT)
            .with_sampler(1, wgpu::ShaderStages::FRAGMENT)
            .build();

        let lit_pipeline = |label: &'static str, transparent: bool| {
            let builder = PipelineBuilder::new(&device, surface_config.format)
                .with_label(label)
                .with_shader_pair(&shaders.lit)
                .with_vertex_buffer(Vertex::desc())
                .with_bind_group_layout(&frame_layout)
                .with_bind_group_layout(&model_layout)
                .with_bind_group_layout(&texture_layout)
                .with_no_culling()
                .with_depth_stencil(depth_state(!transparent))
                .with_sample_count(sample_count);
            if transparent {
                builder.with_alpha_blending().build()
            } else {
                builder.build()
            }
        };
        let opaque_pipeline = lit_pipeline("Opaque Pipeline", false);
        let transparent_pipeline = lit_pipeline("Transparent Pipeline", true);

        let frame_buffer = create_uniform_buffer(&device, &FrameUniforms::default(), "Frame Uniforms");
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("Frame Bind Group"),
        });

        let (model_buffer, model_bind_group) =
            Self::create_model_buffer(&device, &model_layout, INITIAL_MODEL_CAPACITY);

        let (depth_view, msaa_view) =
            Self::create_render_targets(&device, &surface_config, sample_count);

        let fallback_texture = GpuTexture::white(&device, &queue, &texture_layout);
        let particles = ParticleRenderer::new(
            &device,
            surface_config.format,
            &frame_layout,
            &shaders.particle,
            sample_count,
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            sample_count,
            depth_view,
            msaa_view,
            opaque_pipeline,
            transparent_pipeline,
            frame_buffer,
            frame_bind_group,
            model_layout,
            model_buffer,
            model_bind_group,
            model_capacity: INITIAL_MODEL_CAPACITY,
            texture_layout,
            textures: SlotMap::with_key(),
            meshes: SlotMap::with_key(),
            fallback_texture,
            particles,
        })
    }

    /// Width over height of the surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }

    /// Reconfigures the surface and recreates the depth and multisample targets.
    /// Zero-sized requests (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);

        let (depth_view, msaa_view) =
            Self::create_render_targets(&self.device, &self.surface_config, self.sample_count);
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }

    /// Switches between vsync and immediate presentation.
    pub fn set_vsync(&mut self, enabled: bool) {
        self.surface_config.present_mode = if enabled {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self.surface.configure(&self.device, &self.surface_config);
        log::info!("VSync {}", if enabled { "on" } else { "off" });
    }

    /// Whether presentation currently waits for vblank.
    pub fn vsync(&self) -> bool {
        self.surface_config.present_mode == wgpu::PresentMode::AutoVsync
    }

    /// Loads and uploads a texture.
    ///
    /// # Returns
    /// `None` if the file cannot be loaded; the error is logged and drawables using the
    /// handle fall back to plain white.
    pub fn load_texture(&mut self, path: &Path) -> Option<TextureKey> {
        match load_texture_image(path) {
            Ok(image) => {
                let label = path.display().to_string();
                let texture =
                    GpuTexture::upload(&self.device, &self.queue, &self.texture_layout, &image, &label);
                Some(self.textures.insert(texture))
            }
            Err(e) => {
                log::error!("Failed to load texture {}: {e}", path.display());
                None
            }
        }
    }

    /// Uploads mesh data and returns its handle.
    pub fn upload_mesh(&mut self, data: &MeshData, label: &str) -> MeshKey {
        log::debug!(
            "Uploading mesh {label}: {} vertices, {} triangles",
            data.vertices.len(),
            data.triangle_count()
        );
        self.meshes.insert(GpuMesh::new(&self.device, data, label))
    }

    /// Destroys every uploaded mesh and texture.
    ///
    /// Drawables still holding the old keys are skipped (meshes) or drawn with the white
    /// fallback (textures) from then on.
    pub fn release_assets(&mut self) {
        let (meshes, textures) = (self.meshes.len(), self.textures.len());
        for (_, mesh) in self.meshes.drain() {
            mesh.dispose();
        }
        for (_, texture) in self.textures.drain() {
            texture.dispose();
        }
        log::debug!("Released {meshes} meshes and {textures} textures");
    }

    /// Renders and presents one frame.
    ///
    /// # Arguments
    /// * `scene` - Every drawable
    /// * `order` - This frame's partition of `scene`
    /// * `frame` - Camera and lights
    /// * `particles` - Particle instances for the overlay
    ///
    /// # Errors
    /// The [`wgpu::SurfaceError`] from acquiring the next frame. `Lost` and `Outdated` are
    /// recovered by the caller with [`RenderContext::resize`].
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        order: &DrawOrder<DrawableKey>,
        frame: &FrameUniforms,
        particles: &[ParticleInstance],
    ) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(&self.frame_buffer, 0, frame.as_bytes());
        self.write_models(scene, order);
        self.particles.update(&self.queue, particles);

        let surface_texture = self.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let (view, resolve_target) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(&surface_view)),
                None => (&surface_view, None),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            // Model slots follow write_models: opaque keys first, then transparent.
            pass.set_pipeline(&self.opaque_pipeline);
            for (slot, key) in order.opaque.iter().enumerate() {
                if let Some(drawable) = scene.get(*key) {
                    self.draw(&mut pass, slot, drawable, scene.opaque_texture(drawable));
                }
            }

            pass.set_pipeline(&self.transparent_pipeline);
            let first = order.opaque.len();
            for (i, key) in order.transparent.iter().enumerate() {
                if let Some(drawable) = scene.get(*key) {
                    self.draw(&mut pass, first + i, drawable, drawable.texture);
                }
            }

            self.particles.render(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Issues one draw call.
    ///
    /// `texture_override` is bound in place of whatever texture the drawable carries;
    /// `None` binds the white fallback.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        slot: usize,
        drawable: &Drawable,
        texture_override: Option<TextureKey>,
    ) {
        let Some(mesh) = self.meshes.get(drawable.mesh) else {
            return;
        };
        let texture = texture_override
            .and_then(|key| self.textures.get(key))
            .unwrap_or(&self.fallback_texture);

        pass.set_bind_group(1, &self.model_bind_group, &[ModelUniform::offset(slot)]);
        pass.set_bind_group(2, &texture.bind_group, &[]);
        mesh.draw(pass);
    }

    /// Writes one model matrix per visible drawable, in draw order.
    fn write_models(&mut self, scene: &Scene, order: &DrawOrder<DrawableKey>) {
        let models: Vec<ModelUniform> = order
            .opaque
            .iter()
            .chain(order.transparent.iter())
            .map(|key| {
                scene
                    .get(*key)
                    .map_or_else(ModelUniform::zeroed, |d| ModelUniform::new(d.transform.matrix()))
            })
            .collect();

        if models.len() > self.model_capacity {
            let capacity = models.len().next_power_of_two();
            log::debug!("Growing model buffer to {capacity} slots");
            let (buffer, bind_group) =
                Self::create_model_buffer(&self.device, &self.model_layout, capacity);
            self.model_buffer.destroy();
            self.model_buffer = buffer;
            self.model_bind_group = bind_group;
            self.model_capacity = capacity;
        }

        if !models.is_empty() {
            self.queue
                .write_buffer(&self.model_buffer, 0, bytemuck::cast_slice(&models));
        }
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        (width, height): (u32, u32),
    ) -> Result<wgpu::SurfaceConfiguration, RendererError> {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| capabilities.formats.first())
            .copied()
            .ok_or(RendererError::NoSurfaceFormat)?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        })
    }

    fn create_model_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: capacity as u64 * ModelUniform::STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(ModelUniform::BINDING_SIZE),
                }),
            }],
            label: Some("Model Bind Group"),
        });
        (buffer, bind_group)
    }

    fn create_render_targets(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };
        let target = |label, format| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let depth = target("Depth Texture", DEPTH_FORMAT);
        let msaa = (sample_count > 1).then(|| target("MSAA Color Target", config.format));
        (depth, msaa)
    }
}
