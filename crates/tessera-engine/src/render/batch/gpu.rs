use std::num::NonZeroU64;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::backend::BatchBackend;
use super::config::BatchConfig;
use super::staging::quad_indices;
use super::texture::{GpuTexture, TextureId, TextureStore};
use super::vertex::Vertex;

/// Sampled-texture bindings declared by `shaders/batch.wgsl`.
///
/// Equal to wgpu's default `max_sampled_textures_per_shader_stage`, so the
/// pipeline works on any adapter with default limits.
pub const SHADER_TEXTURE_SLOTS: usize = 16;

const SAMPLER_BINDING: u32 = SHADER_TEXTURE_SLOTS as u32;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    view_pos: [f32; 4], // w unused, keeps 16-byte alignment
}

impl CameraUniform {
    fn new(view_proj: Mat4, view_pos: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view_pos: view_pos.extend(1.0).to_array(),
        }
    }
}

/// Cloned attachment views of the frame being drawn.
struct AttachedTarget {
    color: wgpu::TextureView,
    depth: wgpu::TextureView,
}

/// wgpu implementation of `BatchBackend`.
///
/// Owns one dynamic vertex buffer sized for a full batch, a static index
/// buffer generated once, the 1×1 white texture, every texture created through
/// it, and the camera uniform.
///
/// Each `draw` records its own render pass (loading color and depth) and
/// submits it immediately, so the next `upload` cannot overtake it.
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    camera_bind_group: wgpu::BindGroup,
    camera_ubo: wgpu::Buffer,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,

    textures: TextureStore,
    white: TextureId,
    sampler: wgpu::Sampler,

    target: Option<AttachedTarget>,
    warned_no_target: bool,
    warned_unknown_texture: bool,
}

impl GpuBackend {
    /// Creates the pipeline and every buffer a batch of `config` needs.
    ///
    /// Fails if `config` is invalid or does not fit the device.
    pub fn new(ctx: &RenderCtx<'_>, config: &BatchConfig) -> Result<Self> {
        config.validate()?;
        check_limits(ctx.device, config)?;

        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        // ── bindings ──────────────────────────────────────────────────────

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera batch camera bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<CameraUniform>() as u64),
                },
                count: None,
            }],
        });

        let mut texture_entries: Vec<wgpu::BindGroupLayoutEntry> = (0..SHADER_TEXTURE_SLOTS as u32)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            })
            .collect();
        texture_entries.push(wgpu::BindGroupLayoutEntry {
            binding: SAMPLER_BINDING,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera batch texture bgl"),
            entries: &texture_entries,
        });

        // ── pipeline ──────────────────────────────────────────────────────

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera batch shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/batch.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera batch pipeline layout"),
            bind_group_layouts: &[&camera_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera batch pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Box faces do not share one winding as seen from outside.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // ── buffers ───────────────────────────────────────────────────────

        let camera_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera batch camera ubo"),
            contents: bytemuck::bytes_of(&CameraUniform::new(Mat4::IDENTITY, Vec3::ZERO)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera batch camera bind group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera batch vbo"),
            size: config.vertex_buffer_size(),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera batch ibo"),
            contents: bytemuck::cast_slice(&quad_indices(config.max_quads)),
            usage: wgpu::BufferUsages::INDEX,
        });

        // ── textures ──────────────────────────────────────────────────────

        let mut textures = TextureStore::default();
        let white = GpuTexture::create_rgba8(&device, &queue, "tessera white", 1, 1, &[255, 255, 255, 255])
            .context("failed to create white texture")?;
        let white = textures.insert_pinned(white);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tessera batch sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        log::debug!(
            "batch backend: vbo {} bytes, ibo {} bytes, format {:?}/{:?}",
            config.vertex_buffer_size(),
            config.index_buffer_size(),
            ctx.surface_format,
            ctx.depth_format
        );

        Ok(Self {
            device,
            queue,
            pipeline,
            texture_layout,
            camera_bind_group,
            camera_ubo,
            vertex_buffer,
            index_buffer,
            textures,
            white,
            sampler,
            target: None,
            warned_no_target: false,
            warned_unknown_texture: false,
        })
    }

    /// Attachments the following draws render into.
    pub fn set_target(&mut self, target: &RenderTarget<'_>) {
        self.target = Some(AttachedTarget {
            color: target.color_view.clone(),
            depth: target.depth_view.clone(),
        });
    }

    /// Drops the attached views so the frame's surface texture can be presented.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn set_camera(&mut self, view_proj: Mat4, view_pos: Vec3) {
        let uniform = CameraUniform::new(view_proj, view_pos);
        self.queue.write_buffer(&self.camera_ubo, 0, bytemuck::bytes_of(&uniform));
    }

    /// Creates a texture the renderer can sample. `pixels` is tightly packed
    /// sRGB RGBA8, row-major from the top.
    pub fn create_texture_rgba8(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId> {
        let texture = GpuTexture::create_rgba8(&self.device, &self.queue, label, width, height, pixels)?;
        Ok(self.textures.insert(texture))
    }

    /// Destroys a texture created by `create_texture_rgba8`.
    ///
    /// The white texture cannot be destroyed this way. Returns `false` for it
    /// and for unknown handles.
    pub fn destroy_texture(&mut self, id: TextureId) -> bool {
        match self.textures.remove(id) {
            Some(texture) => {
                texture.destroy();
                true
            }
            None => false,
        }
    }

    /// `None` once the white texture is gone (after shutdown).
    fn texture_bind_group(&mut self, textures: &[TextureId]) -> Option<wgpu::BindGroup> {
        let white_view = self.textures.get(self.white)?.view();

        let mut unknown = false;
        let views: Vec<&wgpu::TextureView> = (0..SHADER_TEXTURE_SLOTS)
            .map(|slot| match textures.get(slot) {
                Some(&id) => self.textures.get(id).map(GpuTexture::view).unwrap_or_else(|| {
                    unknown = true;
                    white_view
                }),
                None => white_view,
            })
            .collect();

        let mut entries: Vec<wgpu::BindGroupEntry> = views
            .iter()
            .enumerate()
            .map(|(binding, view)| wgpu::BindGroupEntry {
                binding: binding as u32,
                resource: wgpu::BindingResource::TextureView(view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: SAMPLER_BINDING,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera batch texture bind group"),
            layout: &self.texture_layout,
            entries: &entries,
        });

        if unknown && !self.warned_unknown_texture {
            log::warn!("batch flush: unknown texture handle bound as white");
            self.warned_unknown_texture = true;
        }

        Some(bind_group)
    }
}

impl BatchBackend for GpuBackend {
    fn white_texture(&self) -> TextureId {
        self.white
    }

    fn upload(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        self.queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    fn draw(&mut self, textures: &[TextureId], index_count: u32) {
        if index_count == 0 {
            return;
        }
        if self.target.is_none() {
            if !self.warned_no_target {
                log::warn!("batch flush with no render target attached; draw skipped");
                self.warned_no_target = true;
            }
            return;
        }

        let Some(texture_bind_group) = self.texture_bind_group(textures) else { return };
        let Some(target) = self.target.as_ref() else { return };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera batch encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessera batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.camera_bind_group, &[]);
            rpass.set_bind_group(1, &texture_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..index_count, 0, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
    }

    fn shutdown(&mut self) {
        self.target = None;
        self.textures.drain().for_each(GpuTexture::destroy);
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.camera_ubo.destroy();
        log::debug!("batch backend resources released");
    }
}

fn check_limits(device: &wgpu::Device, config: &BatchConfig) -> Result<()> {
    let limits = device.limits();

    anyhow::ensure!(
        config.max_texture_slots <= SHADER_TEXTURE_SLOTS,
        "batch uses {} texture slots; the shader declares {}",
        config.max_texture_slots,
        SHADER_TEXTURE_SLOTS
    );
    anyhow::ensure!(
        limits.max_sampled_textures_per_shader_stage as usize >= SHADER_TEXTURE_SLOTS,
        "device allows {} sampled textures per stage; batch shader needs {}",
        limits.max_sampled_textures_per_shader_stage,
        SHADER_TEXTURE_SLOTS
    );
    anyhow::ensure!(
        config.vertex_buffer_size() <= limits.max_buffer_size,
        "batch of {} quads needs a {} byte vertex buffer; device limit is {}",
        config.max_quads,
        config.vertex_buffer_size(),
        limits.max_buffer_size
    );
    anyhow::ensure!(
        config.index_buffer_size() <= limits.max_buffer_size,
        "batch of {} quads needs a {} byte index buffer; device limit is {}",
        config.max_quads,
        config.index_buffer_size(),
        limits.max_buffer_size
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_uniform_is_std140_sized() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn camera_uniform_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = CameraUniform::new(m, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(u.view_proj[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.view_pos, [4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn sampler_binds_after_every_texture_slot() {
        assert_eq!(SAMPLER_BINDING as usize, SHADER_TEXTURE_SLOTS);
        assert!(BatchConfig::default().max_texture_slots <= SHADER_TEXTURE_SLOTS);
    }
}
