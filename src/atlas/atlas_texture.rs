//! Atlas GPU upload
//!
//! The packed atlas is written once into an immutable texture and sampled with a
//! linear clamp-to-edge sampler for the rest of the session.

use super::atlas_data::AtlasData;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::borrow::Cow;
use wgpu::{Device, Queue};

/// Atlas texture resources
pub struct AtlasTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

/// Largest uniform downscale of (`width`, `height`) that fits in `max_dimension`
pub fn fit_to_limit(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= max_dimension || largest == 0 {
        return (width, height);
    }
    let scale = max_dimension as f64 / largest as f64;
    (
        ((width as f64 * scale).floor() as u32).max(1),
        ((height as f64 * scale).floor() as u32).max(1),
    )
}

/// Create the atlas texture and upload its pixels
pub fn create_atlas_texture(device: &Device, queue: &Queue, atlas: &AtlasData) -> AtlasTexture {
    let max_dimension = device.limits().max_texture_dimension_2d;
    let (source_width, source_height) = atlas.image.dimensions();
    let (width, height) = fit_to_limit(source_width, source_height, max_dimension);

    // Cells are uniform, so a uniform downscale keeps every cell boundary at the
    // same fraction of the texture and the sampling coordinates stay valid
    let pixels: Cow<'_, RgbaImage> = if (width, height) != (source_width, source_height) {
        log::warn!(
            "[atlas::create_atlas_texture] Atlas scaled from {}x{} to {}x{} due to GPU limits (max: {})",
            source_width,
            source_height,
            width,
            height,
            max_dimension
        );
        Cow::Owned(imageops::resize(&atlas.image, width, height, FilterType::Triangle))
    } else {
        Cow::Borrowed(&atlas.image)
    };

    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    // Unorm, not sRGB: the software renderer samples raw bytes and both must agree
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Tile Wall Atlas"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels.as_raw(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Tile Wall Atlas Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    log::info!(
        "[atlas::create_atlas_texture] Uploaded {}x{} atlas ({} cells)",
        width,
        height,
        atlas.slots.len()
    );

    AtlasTexture {
        texture,
        view,
        sampler,
        width,
        height,
    }
}
