//! # WGPU Pipeline Builder Utilities
//!
//! This module provides builder patterns and helper functions for creating WGPU render pipelines,
//! bind group layouts, and related resources. It keeps pipeline setup in the renderer short and
//! makes the differences between the opaque, transparent and particle pipelines easy to read.
//!
//! ## Key Components
//!
//! - [`PipelineBuilder`] - Fluent API for creating render pipelines
//! - [`BindGroupLayoutBuilder`] - Fluent API for creating bind group layouts
//! - [`create_uniform_buffer`] - Helper for single-value uniform buffers
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use crate::renderer::pipeline_builder::{PipelineBuilder, BindGroupLayoutBuilder};
//!
//! let texture_layout = BindGroupLayoutBuilder::new(&device)
//!     .with_label("Texture Bind Group Layout")
//!     .with_texture(0, wgpu::ShaderStages::FRAGMENT)
//!     .with_sampler(1, wgpu::ShaderStages::FRAGMENT)
//!     .build();
//!
//! let pipeline = PipelineBuilder::new(&device, surface_format)
//!     .with_label("Glass Pipeline")
//!     .with_shader_pair(&shaders)
//!     .with_vertex_buffer(Vertex::desc())
//!     .with_bind_group_layout(&texture_layout)
//!     .with_alpha_blending()
//!     .with_depth_stencil(depth_state(false))
//!     .build();
//! ```

use crate::renderer::shader::ShaderPair;
use wgpu::util::DeviceExt;

/// Format of every depth buffer the renderer creates.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Depth test with `Less`, optionally writing depth.
///
/// Opaque geometry writes depth; blended geometry and particles only test against it.
pub fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Vertex stage entry point of every shader.
const VERTEX_ENTRY: &str = "vs_main";

/// Fragment stage entry point of every shader.
const FRAGMENT_ENTRY: &str = "fs_main";

/// Builder for creating render pipelines.
///
/// ## Default Configuration
///
/// - Vertex entry point: `"vs_main"`
/// - Fragment entry point: `"fs_main"`
/// - Blend state: `REPLACE` (no blending)
/// - Cull mode: `Back` face culling
/// - Primitive topology: `TriangleList`
/// - Front face: Counter-clockwise
/// - Sample count: 1
///
/// ## Required Parameters
///
/// Shader sources must be provided via [`with_shader_pair()`](PipelineBuilder::with_shader_pair).
pub struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    surface_format: wgpu::TextureFormat,
    label: Option<&'a str>,
    shaders: Option<&'a ShaderPair>,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    blend_state: Option<wgpu::BlendState>,
    cull_mode: Option<wgpu::Face>,
    depth_stencil: Option<wgpu::DepthStencilState>,
    sample_count: u32,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a new pipeline builder with default settings.
    ///
    /// # Parameters
    ///
    /// - `device` - The WGPU device used to create the pipeline
    /// - `surface_format` - The texture format of the render target (usually from surface config)
    pub fn new(device: &'a wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            surface_format,
            label: None,
            shaders: None,
            vertex_buffers: Vec::new(),
            bind_group_layouts: Vec::new(),
            blend_state: Some(wgpu::BlendState::REPLACE),
            cull_mode: Some(wgpu::Face::Back),
            depth_stencil: None,
            sample_count: 1,
        }
    }

    /// Set the pipeline label for debugging purposes.
    ///
    /// The label is used for the pipeline, its shader modules and its layout.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Use separate vertex and fragment sources, each compiled into its own module.
    pub fn with_shader_pair(mut self, shaders: &'a ShaderPair) -> Self {
        self.shaders = Some(shaders);
        self
    }

    /// Add a vertex buffer layout. Slots are assigned in call order.
    pub fn with_vertex_buffer(mut self, layout: wgpu::VertexBufferLayout<'a>) -> Self {
        self.vertex_buffers.push(layout);
        self
    }

    /// Add a bind group layout. Group indices are assigned in call order.
    pub fn with_bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    /// Enable standard alpha blending.
    ///
    /// - Color: `(SrcAlpha * src) + (OneMinusSrcAlpha * dst)`
    /// - Alpha: `src + (OneMinusSrcAlpha * dst)`
    pub fn with_alpha_blending(mut self) -> Self {
        self.blend_state = Some(wgpu::BlendState::ALPHA_BLENDING);
        self
    }

    /// Disable face culling, rendering both sides of every triangle.
    pub fn with_no_culling(mut self) -> Self {
        self.cull_mode = None;
        self
    }

    /// Set depth and stencil testing configuration. See [`depth_state`].
    pub fn with_depth_stencil(mut self, depth_stencil: wgpu::DepthStencilState) -> Self {
        self.depth_stencil = Some(depth_stencil);
        self
    }

    /// Set the MSAA sample count; must match the attachments the pipeline renders into.
    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.sample_count = count.max(1);
        self
    }

    /// Build the render pipeline with the configured parameters.
    ///
    /// # Panics
    ///
    /// Panics if no shader source was provided.
    pub fn build(self) -> wgpu::RenderPipeline {
        let shaders = self.shaders.expect("Shader source must be provided");

        let create_module = |code: &str| {
            self.device
                .create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: self.label,
                    source: wgpu::ShaderSource::Wgsl(code.into()),
                })
        };
        let vertex_module = create_module(&shaders.vertex);
        let fragment_module = create_module(&shaders.fragment);

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: self.label,
                bind_group_layouts: &self.bind_group_layouts,
                push_constant_ranges: &[],
            });

        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &self.vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.surface_format,
                        blend: self.blend_state,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: self.cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: self.depth_stencil.clone(),
                multisample: wgpu::MultisampleState {
                    count: self.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
    }
}

/// Builder for creating bind group layouts.
///
/// ## Supported Resource Types
///
/// - 2D textures with float sampling
/// - Filtering samplers
/// - Uniform buffers, with or without dynamic offsets
///
/// ```rust,no_run
/// let layout = BindGroupLayoutBuilder::new(&device)
///     .with_label("Model Bind Group Layout")
///     .with_dynamic_uniform_buffer(0, wgpu::ShaderStages::VERTEX, ModelUniform::BINDING_SIZE)
///     .build();
/// ```
pub struct BindGroupLayoutBuilder<'a> {
    device: &'a wgpu::Device,
    entries: Vec<wgpu::BindGroupLayoutEntry>,
    label: Option<&'a str>,
}

impl<'a> BindGroupLayoutBuilder<'a> {
    /// Create a new bind group layout builder.
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self {
            device,
            entries: Vec::new(),
            label: None,
        }
    }

    /// Set the bind group layout label for debugging.
    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Add a 2D texture binding.
    ///
    /// # Shader Usage
    ///
    /// ```wgsl
    /// @group(1) @binding(0) var t_diffuse: texture_2d<f32>;
    /// ```
    pub fn with_texture(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        });
        self
    }

    /// Add a filtering sampler binding.
    pub fn with_sampler(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
        self
    }

    /// Add a uniform buffer binding.
    pub fn with_uniform_buffer(mut self, binding: u32, visibility: wgpu::ShaderStages) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });
        self
    }

    /// Add a uniform buffer binding addressed with a dynamic offset per draw.
    ///
    /// `element_size` is the size of one element as seen by the shader.
    pub fn with_dynamic_uniform_buffer(
        mut self,
        binding: u32,
        visibility: wgpu::ShaderStages,
        element_size: u64,
    ) -> Self {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(element_size),
            },
            count: None,
        });
        self
    }

    /// Build the bind group layout.
    pub fn build(self) -> wgpu::BindGroupLayout {
        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &self.entries,
                label: self.label,
            })
    }
}

/// Creates a uniform buffer initialised with `data`.
pub fn create_uniform_buffer<T: bytemuck::Pod>(
    device: &wgpu::Device,
    data: &T,
    label: &str,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(std::slice::from_ref(data)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}
