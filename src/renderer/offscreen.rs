//! Offscreen rendering of the per-pixel program
//!
//! Draws the tile wall into a texture instead of a window surface and reads it
//! back: colors from `fs_main`, or image indices from `fs_index`.

use super::error::{RenderError, RenderResult};
use super::renderer_data::Viewport;
use super::renderer_operations::{create_bind_group, create_bind_group_layout, create_pipeline};
use crate::atlas::AtlasTexture;
use crate::transform::{self, TransformUniform};
use image::RgbaImage;
use wgpu::util::DeviceExt;

// Both readback formats (Rgba8Unorm, R32Uint) are 4 bytes per texel
const BYTES_PER_TEXEL: usize = 4;

/// Fragment entry point and the target it writes
struct OffscreenPass<'a> {
    fragment_entry: &'a str,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
}

/// Acquire a GPU without a window
pub async fn create_headless_device() -> RenderResult<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(RenderError::AdapterNotFound)?;

    let info = adapter.get_info();
    log::info!(
        "[renderer::create_headless_device] Using {} ({:?}, {:?})",
        info.name,
        info.device_type,
        info.backend
    );

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Tile Wall Headless Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
            },
            None,
        )
        .await?;

    Ok((device, queue))
}

/// Render one frame offscreen and return its pixels, top row first
pub fn render_offscreen(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    atlas: &AtlasTexture,
    uniform: &TransformUniform,
    viewport: Viewport,
) -> RenderResult<RgbaImage> {
    let bytes = draw_offscreen(
        device,
        queue,
        atlas,
        uniform,
        viewport,
        OffscreenPass {
            fragment_entry: transform::FRAGMENT_ENTRY,
            format: wgpu::TextureFormat::Rgba8Unorm,
            blend: Some(wgpu::BlendState::REPLACE),
        },
    )?;

    RgbaImage::from_raw(viewport.width, viewport.height, bytes)
        .ok_or_else(|| RenderError::Readback("color readback has the wrong size".to_string()))
}

/// Image index the GPU program selects under every pixel center, row-major from
/// the top-left; `None` in the gap
pub fn render_index_map_gpu(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    atlas: &AtlasTexture,
    uniform: &TransformUniform,
    viewport: Viewport,
) -> RenderResult<Vec<Option<u32>>> {
    let bytes = draw_offscreen(
        device,
        queue,
        atlas,
        uniform,
        viewport,
        OffscreenPass {
            fragment_entry: transform::INDEX_ENTRY,
            format: wgpu::TextureFormat::R32Uint,
            blend: None,
        },
    )?;
    Ok(decode_index_texels(&bytes))
}

/// `fs_index` texels to image indices: 0 is the gap, anything else is `index + 1`
pub fn decode_index_texels(bytes: &[u8]) -> Vec<Option<u32>> {
    bytes
        .chunks_exact(BYTES_PER_TEXEL)
        .map(|texel| u32::from_ne_bytes([texel[0], texel[1], texel[2], texel[3]]).checked_sub(1))
        .collect()
}

/// Row pitch rounded up to the copy alignment
pub fn padded_row_bytes(tight_row_bytes: usize) -> usize {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
    (tight_row_bytes + align - 1) / align * align
}

/// Strip the per-row copy padding from a readback buffer
pub fn depad_rows(data: &[u8], padded_row: usize, tight_row: usize) -> Vec<u8> {
    if padded_row == 0 {
        return Vec::new();
    }
    let rows = data.len() / padded_row;
    let mut tight = Vec::with_capacity(tight_row * rows);
    for row in data.chunks_exact(padded_row) {
        tight.extend_from_slice(&row[..tight_row]);
    }
    tight
}

fn draw_offscreen(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    atlas: &AtlasTexture,
    uniform: &TransformUniform,
    viewport: Viewport,
    pass: OffscreenPass<'_>,
) -> RenderResult<Vec<u8>> {
    let OffscreenPass {
        fragment_entry,
        format,
        blend,
    } = pass;

    if viewport.width == 0 || viewport.height == 0 {
        return Ok(Vec::new());
    }

    let size = wgpu::Extent3d {
        width: viewport.width,
        height: viewport.height,
        depth_or_array_layers: 1,
    };
    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Tile Wall Offscreen Target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Tile Wall Offscreen Uniform"),
        contents: bytemuck::bytes_of(uniform),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    let bind_group_layout = create_bind_group_layout(device);
    let bind_group = create_bind_group(device, &bind_group_layout, &uniform_buffer, atlas);

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = create_pipeline(device, &bind_group_layout, fragment_entry, format, blend);
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        log::error!(
            "[renderer::draw_offscreen] {} pipeline validation failed: {}",
            fragment_entry,
            error
        );
        return Err(RenderError::Pipeline(error.to_string()));
    }

    let tight_row = viewport.width as usize * BYTES_PER_TEXEL;
    let padded_row = padded_row_bytes(tight_row);
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Tile Wall Readback"),
        size: (padded_row * viewport.height as usize) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Tile Wall Offscreen Encoder"),
    });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Tile Wall Offscreen Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.set_pipeline(&pipeline);
        render_pass.set_bind_group(0, &bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &staging,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_row as u32),
                rows_per_image: Some(viewport.height),
            },
        },
        size,
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (sender, receiver) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device.poll(wgpu::Maintain::Wait);

    receiver
        .recv()
        .map_err(|_| RenderError::Readback("mapping callback dropped".to_string()))?
        .map_err(|e| RenderError::Readback(format!("buffer mapping failed: {:?}", e)))?;

    let data = slice.get_mapped_range();
    let tight = depad_rows(&data, padded_row, tight_row);
    drop(data);
    staging.unmap();

    log::debug!(
        "[renderer::draw_offscreen] Read back {}x{} from {}",
        viewport.width,
        viewport.height,
        fragment_entry
    );
    Ok(tight)
}
