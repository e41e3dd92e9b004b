use alphamask_core::image::Image;
use alphamask_core::sampler::{AddressMode, FilterMode, Sampler};
use alphamask_core::Resolution;
use wgpu::{BindGroupLayout, Buffer, Device, RenderPipeline};

use crate::shader::{Uniforms, FRAGMENT_ENTRY, MASK_WGSL, VERTEX_ENTRY};
use crate::{GpuContext, GpuError};

const SOURCE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn address_mode(mode: AddressMode) -> wgpu::AddressMode {
    match mode {
        AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        AddressMode::Repeat => wgpu::AddressMode::Repeat,
        AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

fn filter_mode(filter: FilterMode) -> wgpu::FilterMode {
    match filter {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    }
}

/// Offscreen render pass that runs the mask shader over a whole target and
/// reads the result back to the CPU.
///
/// Resolution-independent resources (pipeline, layout, uniform buffer) are
/// built once; textures and the readback buffer are created per run.
pub struct MaskPass {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    uniform_buf: Buffer,
}

impl MaskPass {
    pub fn new(device: &Device) -> Self {
        // binding 0 : Uniforms uniform buffer
        // binding 1 : source texture
        // binding 2 : source sampler
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mask_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mask_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("alpha_mask"),
            source: wgpu::ShaderSource::Wgsl(MASK_WGSL.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mask_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: VERTEX_ENTRY,
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: FRAGMENT_ENTRY,
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mask_uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buf,
        }
    }

    /// Classify every pixel of a `width x height` target against `source`.
    ///
    /// The returned image uses the CPU row convention (row 0 = bottom), so it
    /// can be compared directly with `alphamask_core::render::render`. With
    /// `FilterMode::Nearest` the two are identical. With `FilterMode::Linear`
    /// hardware quantizes the blend weights, so pixels whose blended alpha is
    /// barely above zero on the CPU can come out empty here.
    pub fn run(
        &self,
        ctx: &GpuContext,
        source: &Image,
        sampler: Sampler,
        width: u32,
        height: u32,
    ) -> Result<Image, GpuError> {
        let resolution = Resolution::from_pixels(width, height)?;
        let device = &ctx.device;
        let queue = &ctx.queue;

        let max = device.limits().max_texture_dimension_2d;
        check_texture_size(source.width(), source.height(), max)?;
        check_texture_size(width, height, max)?;

        queue.write_buffer(&self.uniform_buf, 0, bytemuck::bytes_of(&Uniforms::new(resolution)));

        // --- source texture ----------------------------------------------------
        let source_size = wgpu::Extent3d {
            width: source.width(),
            height: source.height(),
            depth_or_array_layers: 1,
        };
        let source_tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("mask_source"),
            size: source_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SOURCE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        // CPU row 0 (v = 0) becomes texture row 0, which is also v = 0 on the GPU.
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &source_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &source.to_rgba8(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(source.width() * 4),
                rows_per_image: Some(source.height()),
            },
            source_size,
        );
        let source_view = source_tex.create_view(&Default::default());

        let gpu_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mask_sampler"),
            address_mode_u: address_mode(sampler.address_mode),
            address_mode_v: address_mode(sampler.address_mode),
            address_mode_w: address_mode(sampler.address_mode),
            mag_filter: filter_mode(sampler.filter),
            min_filter: filter_mode(sampler.filter),
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mask_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&source_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&gpu_sampler),
                },
            ],
        });

        // --- target + readback -------------------------------------------------
        let target_size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target_tex = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("mask_target"),
            size: target_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target_tex.create_view(&Default::default());

        let padded_bytes_per_row = padded_row_bytes(width);
        let readback_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mask_readback"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mask_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mask_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target_tex,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &readback_buf,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            target_size,
        );
        queue.submit(Some(encoder.finish()));

        let slice = readback_buf.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device.poll(wgpu::Maintain::Wait);
        rx.recv().map_err(|_| GpuError::MapChannelClosed)??;

        let pixels = {
            let data = slice.get_mapped_range();
            unpad_rows(&data, width, height, padded_bytes_per_row)
        };
        readback_buf.unmap();

        log::debug!("rendered {width}x{height} mask on the GPU");

        // Target row 0 is the top of the frame; flip to bottom-up.
        Ok(Image::from_rgba8(width, height, &pixels)?.flipped_rows())
    }
}

/// wgpu panics on oversized textures; report them as an error instead.
fn check_texture_size(width: u32, height: u32, max: u32) -> Result<(), GpuError> {
    if width > max || height > max {
        return Err(GpuError::TextureTooLarge { width, height, max });
    }
    Ok(())
}

/// Bytes per row rounded up to `COPY_BYTES_PER_ROW_ALIGNMENT`.
fn padded_row_bytes(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

/// Strip the per-row padding from a mapped readback buffer.
fn unpad_rows(data: &[u8], width: u32, height: u32, padded_bytes_per_row: u32) -> Vec<u8> {
    let row_bytes = width as usize * 4;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in data.chunks(padded_bytes_per_row as usize).take(height as usize) {
        pixels.extend_from_slice(&row[..row_bytes]);
    }
    pixels
}
