//! Software per-pixel realization
//!
//! Evaluates `resolve_tile` at every pixel center on the CPU, one rayon task per
//! row. Sampling follows the GPU sampler: bilinear filtering at texel centers with
//! clamp-to-edge addressing.

use crate::config::TransformConfig;
use crate::transform::{atlas_texel_uv, pixel_to_uv, resolve_tile, TransformParams};
use glam::Vec2;
use image::RgbaImage;
use rayon::prelude::*;

/// Screen UV of the center of pixel (`x`, `y`)
pub fn pixel_center_uv(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    pixel_to_uv(x as f32 + 0.5, y as f32 + 0.5, width, height)
}

/// Bilinear clamp-to-edge sample of `atlas` at a top-down texel coordinate, in [0, 1]
pub fn sample_bilinear(atlas: &RgbaImage, texel_uv: Vec2) -> [f32; 4] {
    let (width, height) = atlas.dimensions();
    if width == 0 || height == 0 {
        return [0.0; 4];
    }

    let x = texel_uv.x * width as f32 - 0.5;
    let y = texel_uv.y * height as f32 - 0.5;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let clamp_x = |v: f32| (v.max(0.0) as u32).min(width - 1);
    let clamp_y = |v: f32| (v.max(0.0) as u32).min(height - 1);
    let (ax, bx) = (clamp_x(x0), clamp_x(x0 + 1.0));
    let (ay, by) = (clamp_y(y0), clamp_y(y0 + 1.0));

    let p00 = atlas.get_pixel(ax, ay).0;
    let p10 = atlas.get_pixel(bx, ay).0;
    let p01 = atlas.get_pixel(ax, by).0;
    let p11 = atlas.get_pixel(bx, by).0;

    let mut out = [0.0; 4];
    for (channel, value) in out.iter_mut().enumerate() {
        let top = p00[channel] as f32 * (1.0 - fx) + p10[channel] as f32 * fx;
        let bottom = p01[channel] as f32 * (1.0 - fx) + p11[channel] as f32 * fx;
        *value = (top * (1.0 - fy) + bottom * fy) / 255.0;
    }
    out
}

/// Color of one pixel: atlas sample or gap fill, then depth darkening
pub fn shade_pixel(params: &TransformParams, atlas: &RgbaImage, uv: Vec2, style: &TransformConfig) -> [u8; 4] {
    let resolution = resolve_tile(params, uv);
    let color = match resolution.atlas_uv {
        Some(sample_uv) => sample_bilinear(atlas, atlas_texel_uv(sample_uv)),
        None => style.gap_fill,
    };

    let shade = 1.0 - params.depth * style.depth_darkening;
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        to_byte(color[0] * shade),
        to_byte(color[1] * shade),
        to_byte(color[2] * shade),
        to_byte(color[3]),
    ]
}

/// Render a full frame on the CPU
pub fn render_software(
    params: &TransformParams,
    atlas: &RgbaImage,
    width: u32,
    height: u32,
    style: &TransformConfig,
) -> RgbaImage {
    let row_bytes = width as usize * 4;
    let mut buffer = vec![0u8; row_bytes * height as usize];

    if row_bytes > 0 {
        buffer
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let uv = pixel_center_uv(x as u32, y as u32, width, height);
                    pixel.copy_from_slice(&shade_pixel(params, atlas, uv, style));
                }
            });
    }

    // Length is exactly width * height * 4
    RgbaImage::from_raw(width, height, buffer).unwrap_or_else(|| RgbaImage::new(width, height))
}

/// Image index under every pixel center, row-major from the top-left; `None` in the gap
pub fn resolve_index_map(params: &TransformParams, width: u32, height: u32) -> Vec<Option<u32>> {
    (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            (0..width).map(move |x| resolve_tile(params, pixel_center_uv(x, y, width, height)).image_index)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{build_params, compute_repeat, AtlasGrid, SelectionPolicy};
    use image::Rgba;

    fn params(repeat: Vec2, offset: Vec2, gap: f32, depth: f32, count: u32, grid: AtlasGrid) -> TransformParams {
        build_params(repeat, offset, gap, depth, count, grid, SelectionPolicy::Positional)
    }

    #[test]
    fn test_uniform_atlas_renders_flat() {
        let atlas = RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 255]));
        let p = params(Vec2::splat(4.0), Vec2::ZERO, 0.0, 0.0, 4, AtlasGrid { cols: 2, rows: 2 });
        let frame = render_software(&p, &atlas, 16, 16, &TransformConfig::default());

        assert_eq!(frame.dimensions(), (16, 16));
        assert!(frame.pixels().all(|px| px.0 == [10, 200, 30, 255]));
    }

    #[test]
    fn test_gap_pixels_use_fill_color() {
        let atlas = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        let p = params(Vec2::splat(4.0), Vec2::ZERO, 1.0, 0.0, 4, AtlasGrid { cols: 2, rows: 2 });
        let frame = render_software(&p, &atlas, 64, 64, &TransformConfig::default());

        // Column 0 sits 1/32 into its tile, inside the widest margin
        assert_eq!(frame.get_pixel(0, 20).0, [13, 13, 20, 255]);
        // Tile center is image content
        assert_eq!(frame.get_pixel(8, 8).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_depth_darkens_every_pixel() {
        let atlas = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 255]));
        let p = params(Vec2::splat(4.0), Vec2::ZERO, 0.0, 1.0, 4, AtlasGrid { cols: 2, rows: 2 });
        let frame = render_software(&p, &atlas, 8, 8, &TransformConfig::default());

        assert!(frame.pixels().all(|px| px.0 == [160, 80, 40, 255]));
    }

    #[test]
    fn test_top_atlas_row_is_image_zero() {
        // One column, two rows: image 0 packed on top (red), image 1 below (blue)
        let mut atlas = RgbaImage::from_pixel(4, 8, Rgba([0, 0, 255, 255]));
        for y in 0..4 {
            for x in 0..4 {
                atlas.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        let grid = AtlasGrid { cols: 1, rows: 2 };
        let repeat = compute_repeat(1.0, 8, 8);

        let first = params(repeat, Vec2::ZERO, 0.0, 0.0, 2, grid);
        let frame = render_software(&first, &atlas, 8, 8, &TransformConfig::default());
        assert_eq!(frame.get_pixel(4, 4).0, [255, 0, 0, 255]);

        let second = params(repeat, Vec2::new(0.0, 1.0), 0.0, 0.0, 2, grid);
        let frame = render_software(&second, &atlas, 8, 8, &TransformConfig::default());
        assert_eq!(frame.get_pixel(4, 4).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_index_map_matches_transform() {
        let p = params(Vec2::new(5.3, 3.0), Vec2::new(-1.7, 0.4), 0.6, 0.5, 7, AtlasGrid { cols: 3, rows: 3 });
        let (width, height) = (53, 30);
        let map = resolve_index_map(&p, width, height);

        assert_eq!(map.len(), (width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let expected = resolve_tile(&p, pixel_center_uv(x, y, width, height)).image_index;
                assert_eq!(map[(y * width + x) as usize], expected);
            }
        }
        assert!(map.iter().flatten().all(|&i| i < 7));
    }

    #[test]
    fn test_sample_bilinear_clamps_at_edges() {
        let mut atlas = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        atlas.put_pixel(1, 0, Rgba([255, 255, 255, 255]));

        assert_eq!(sample_bilinear(&atlas, Vec2::new(0.0, 0.5))[0], 0.0);
        assert_eq!(sample_bilinear(&atlas, Vec2::new(1.0, 0.5))[0], 1.0);
        assert!((sample_bilinear(&atlas, Vec2::new(0.5, 0.5))[0] - 0.5).abs() < 1e-6);
    }
}
