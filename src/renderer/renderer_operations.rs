//! Renderer Operations - GPU per-pixel realization
//!
//! One fullscreen triangle per frame; the fragment program evaluates the tile
//! transform for every pixel from a single uniform snapshot.

use super::error::{RenderError, RenderResult};
use super::renderer_data::{RendererData, Viewport};
use crate::atlas::{create_atlas_texture, AtlasData, AtlasTexture};
use crate::transform::{self, TransformUniform};
use bytemuck::Zeroable;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Prefer a linear (non-sRGB) format so presented bytes match the software path
pub fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Acquire the GPU, configure the window surface and build the tile wall pipeline
pub async fn create_renderer(window: Arc<Window>, atlas: &AtlasData) -> RenderResult<RendererData> {
    let size = window.inner_size();

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let surface = instance.create_surface(window)?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or(RenderError::AdapterNotFound)?;

    let info = adapter.get_info();
    log::info!(
        "[renderer::create_renderer] Using {} ({:?}, {:?})",
        info.name,
        info.device_type,
        info.backend
    );

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Tile Wall Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
            },
            None,
        )
        .await?;

    let capabilities = surface.get_capabilities(&adapter);
    let format =
        choose_surface_format(&capabilities.formats).ok_or(RenderError::UnsupportedSurface)?;
    let alpha_mode = capabilities
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &surface_config);

    log::info!(
        "[renderer::create_renderer] Surface {}x{} {:?}",
        surface_config.width,
        surface_config.height,
        format
    );

    let atlas_texture = create_atlas_texture(&device, &queue, atlas);

    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Tile Wall Uniform"),
        contents: bytemuck::bytes_of(&TransformUniform::zeroed()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = create_bind_group_layout(&device);
    let bind_group = create_bind_group(&device, &bind_group_layout, &uniform_buffer, &atlas_texture);

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = create_pipeline(
        &device,
        &bind_group_layout,
        transform::FRAGMENT_ENTRY,
        format,
        Some(wgpu::BlendState::REPLACE),
    );
    if let Some(error) = device.pop_error_scope().await {
        log::error!("[renderer::create_renderer] Pipeline validation failed: {}", error);
        return Err(RenderError::Pipeline(error.to_string()));
    }

    Ok(RendererData {
        surface,
        device,
        queue,
        surface_config,
        pipeline,
        bind_group,
        uniform_buffer,
        atlas: atlas_texture,
        last_uniform: None,
        frames_presented: 0,
    })
}

pub(super) fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Tile Wall Bind Group Layout"),
        entries: &[
            // Transform snapshot
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<TransformUniform>() as u64,
                    ),
                },
                count: None,
            },
            // Atlas
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
    })
}

pub(super) fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    atlas: &AtlasTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Tile Wall Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&atlas.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&atlas.sampler),
            },
        ],
    })
}

/// Fullscreen pipeline for one fragment entry point; integer targets take no blend
pub(super) fn create_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    let shader = transform::create_shader_module(device);

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Tile Wall Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(fragment_entry),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: transform::VERTEX_ENTRY,
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: fragment_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

// ============================================================================
// SURFACE
// ============================================================================

/// Current drawable size
pub fn renderer_viewport(renderer: &RendererData) -> Viewport {
    Viewport {
        width: renderer.surface_config.width,
        height: renderer.surface_config.height,
    }
}

/// Reconfigure the surface for a new drawable size. Zero sizes (minimized) are ignored.
pub fn resize_renderer(renderer: &mut RendererData, viewport: Viewport) {
    if viewport.width == 0 || viewport.height == 0 {
        return;
    }
    renderer.surface_config.width = viewport.width;
    renderer.surface_config.height = viewport.height;
    renderer
        .surface
        .configure(&renderer.device, &renderer.surface_config);
    log::debug!(
        "[renderer::resize_renderer] Surface resized to {}x{}",
        viewport.width,
        viewport.height
    );
}

// ============================================================================
// FRAME
// ============================================================================

/// Upload the snapshot and draw one frame
///
/// A lost or outdated surface is reconfigured and the frame skipped; only running
/// out of memory is reported.
pub fn render_frame(renderer: &mut RendererData, uniform: &TransformUniform) -> RenderResult<()> {
    if renderer.last_uniform.as_ref() != Some(uniform) {
        renderer
            .queue
            .write_buffer(&renderer.uniform_buffer, 0, bytemuck::bytes_of(uniform));
        renderer.last_uniform = Some(*uniform);
    }

    let frame = match renderer.surface.get_current_texture() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::debug!("[renderer::render_frame] Surface lost or outdated, reconfiguring");
            renderer
                .surface
                .configure(&renderer.device, &renderer.surface_config);
            return Ok(());
        }
        Err(wgpu::SurfaceError::Timeout) => {
            log::warn!("[renderer::render_frame] Surface timeout, skipping frame");
            return Ok(());
        }
        Err(wgpu::SurfaceError::OutOfMemory) => {
            log::error!("[renderer::render_frame] Out of memory acquiring surface texture");
            return Err(RenderError::Lost);
        }
    };

    let view = frame
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = renderer
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Tile Wall Encoder"),
        });

    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Tile Wall Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
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

        pass.set_pipeline(&renderer.pipeline);
        pass.set_bind_group(0, &renderer.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    renderer.queue.submit(std::iter::once(encoder.finish()));
    frame.present();
    renderer.frames_presented += 1;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn test_surface_format_prefers_linear() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn test_surface_format_falls_back_to_first() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(choose_surface_format(&[]), None);
    }
}
