//! Texture Atlas Operations - Pure DOP Functions
//!
//! Cover-fit packing of N source images into a fixed R x C grid.

use super::atlas_data::{AtlasData, AtlasLayout, AtlasSlot, SourceCrop, SourceImage};
use crate::config::AtlasConfig;
use crate::transform::AtlasGrid;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Atlas layout described by the configuration
pub fn layout_from_config(config: &AtlasConfig) -> AtlasLayout {
    AtlasLayout {
        cols: config.cols,
        rows: config.rows,
        cell_width: config.cell_width,
        cell_height: config.cell_height,
    }
}

/// Grid shape as the tile transform sees it
pub fn atlas_grid(layout: &AtlasLayout) -> AtlasGrid {
    AtlasGrid {
        cols: layout.cols,
        rows: layout.rows,
    }
}

/// Pixel size of the packed atlas, saturating at `u32::MAX`
pub fn atlas_dimensions(layout: &AtlasLayout) -> (u32, u32) {
    (
        layout.cols.saturating_mul(layout.cell_width),
        layout.rows.saturating_mul(layout.cell_height),
    )
}

pub fn cell_capacity(layout: &AtlasLayout) -> usize {
    layout.cols as usize * layout.rows as usize
}

/// Top-left pixel of the cell holding `index` (row-major, row 0 at the top)
pub fn cell_origin(layout: &AtlasLayout, index: u32) -> (u32, u32) {
    let col = index % layout.cols;
    let row = index / layout.cols;
    (col * layout.cell_width, row * layout.cell_height)
}

/// Largest centered window of the source with the cell's aspect ratio
///
/// Cropping happens in source space so only the kept pixels are ever resampled.
pub fn cover_crop(image_width: u32, image_height: u32, cell_width: u32, cell_height: u32) -> SourceCrop {
    let full = SourceCrop {
        x: 0,
        y: 0,
        width: image_width,
        height: image_height,
    };
    if image_width == 0 || image_height == 0 || cell_width == 0 || cell_height == 0 {
        return full;
    }

    let image_aspect = image_width as f64 / image_height as f64;
    let cell_aspect = cell_width as f64 / cell_height as f64;

    if image_aspect > cell_aspect {
        // Wider than the cell: keep the full height, trim both sides
        let width = ((image_height as f64 * cell_aspect).round() as u32).clamp(1, image_width);
        SourceCrop {
            x: (image_width - width) / 2,
            width,
            ..full
        }
    } else {
        // Taller (or equal): keep the full width, trim top and bottom
        let height = ((image_width as f64 / cell_aspect).round() as u32).clamp(1, image_height);
        SourceCrop {
            y: (image_height - height) / 2,
            height,
            ..full
        }
    }
}

/// Flat square substituted for an image that failed to load
pub fn placeholder_image(size: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(size, size, Rgba(color))
}

/// Pack images into a new atlas, in order, one per cell
///
/// Never fails: cells are pre-filled with `background` and images beyond the grid
/// capacity are dropped with a warning.
pub fn pack_atlas(images: &[SourceImage], layout: &AtlasLayout, background: [u8; 4]) -> AtlasData {
    let (width, height) = atlas_dimensions(layout);
    let mut atlas = RgbaImage::from_pixel(width, height, Rgba(background));

    let capacity = cell_capacity(layout);
    if images.len() > capacity {
        log::warn!(
            "[atlas::pack_atlas] {} images for {} cells, dropping {}",
            images.len(),
            capacity,
            images.len() - capacity
        );
    }

    let mut slots = Vec::with_capacity(images.len().min(capacity));
    for (index, source) in images.iter().take(capacity).enumerate() {
        let index = index as u32;
        let (x, y) = cell_origin(layout, index);
        let (source_width, source_height) = source.pixels.dimensions();
        if source_width == 0 || source_height == 0 {
            log::warn!(
                "[atlas::pack_atlas] Image {} is empty, leaving its cell blank",
                index
            );
        } else {
            let crop = cover_crop(
                source_width,
                source_height,
                layout.cell_width,
                layout.cell_height,
            );
            let window = imageops::crop_imm(&source.pixels, crop.x, crop.y, crop.width, crop.height);
            let cell = if (crop.width, crop.height) == (layout.cell_width, layout.cell_height) {
                window.to_image()
            } else {
                imageops::resize(
                    &*window,
                    layout.cell_width,
                    layout.cell_height,
                    FilterType::Triangle,
                )
            };

            // Composite over the background fill
            imageops::overlay(&mut atlas, &cell, x as i64, y as i64);
        }

        slots.push(AtlasSlot {
            image_index: index,
            col: index % layout.cols,
            row: index / layout.cols,
            placeholder: source.placeholder,
        });
    }

    log::info!(
        "[atlas::pack_atlas] Packed {} images into {}x{} atlas ({}x{} grid, {} placeholders)",
        slots.len(),
        width,
        height,
        layout.cols,
        layout.rows,
        slots.iter().filter(|s| s.placeholder).count()
    );

    AtlasData {
        image: atlas,
        layout: *layout,
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: [u8; 4] = [0x0d, 0x0d, 0x12, 0xff];

    fn solid(width: u32, height: u32, color: [u8; 4]) -> SourceImage {
        SourceImage {
            pixels: RgbaImage::from_pixel(width, height, Rgba(color)),
            origin: None,
            placeholder: false,
        }
    }

    fn layout(cols: u32, rows: u32, cell: u32) -> AtlasLayout {
        AtlasLayout {
            cols,
            rows,
            cell_width: cell,
            cell_height: cell,
        }
    }

    #[test]
    fn test_cover_crop_wide_image() {
        let crop = cover_crop(200, 100, 100, 100);
        assert_eq!(
            crop,
            SourceCrop {
                x: 50,
                y: 0,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn test_cover_crop_tall_image() {
        let crop = cover_crop(100, 300, 100, 100);
        assert_eq!(
            crop,
            SourceCrop {
                x: 0,
                y: 100,
                width: 100,
                height: 100
            }
        );
    }

    #[test]
    fn test_cover_crop_non_square_cell() {
        // 4:3 image into a 2:1 cell is relatively taller: widths match
        let crop = cover_crop(400, 300, 200, 100);
        assert_eq!((crop.width, crop.height), (400, 200));
        assert_eq!((crop.x, crop.y), (0, 50));
    }

    #[test]
    fn test_cover_crop_keeps_cell_aspect_inside_source() {
        for &(w, h) in &[(1920, 1080), (1080, 1920), (640, 641), (33, 2000), (5000, 7), (512, 512)] {
            for &(cw, ch) in &[(512, 512), (300, 200), (200, 300)] {
                let crop = cover_crop(w, h, cw, ch);
                assert!(crop.x + crop.width <= w && crop.y + crop.height <= h);
                // One axis is kept whole, the other matches the cell aspect within a pixel
                assert!(crop.width == w || crop.height == h);
                let expected_width = crop.height as f64 * cw as f64 / ch as f64;
                let expected_height = crop.width as f64 * ch as f64 / cw as f64;
                assert!(
                    (crop.width as f64 - expected_width).abs() <= 1.0
                        || (crop.height as f64 - expected_height).abs() <= 1.0
                );
            }
        }
    }

    #[test]
    fn test_extreme_aspect_crops_before_resizing() {
        // A 1x4000 strip keeps a single source pixel for a square cell
        let crop = cover_crop(1, 4000, 512, 512);
        assert_eq!(
            crop,
            SourceCrop {
                x: 0,
                y: 1999,
                width: 1,
                height: 1
            }
        );
        let crop = cover_crop(40_000, 3, 512, 256);
        assert_eq!((crop.width, crop.height), (6, 3));

        // Only the center pixel is green; the packed cell must be that color
        let mut strip = RgbaImage::from_pixel(1, 4000, Rgba([255, 0, 0, 255]));
        strip.put_pixel(0, 1999, Rgba([0, 255, 0, 255]));
        let source = SourceImage {
            pixels: strip,
            origin: None,
            placeholder: false,
        };
        let atlas = pack_atlas(&[source], &layout(1, 1, 512), BG);
        assert_eq!(atlas.image.dimensions(), (512, 512));
        assert!(atlas.image.pixels().all(|p| p.0 == [0, 255, 0, 255]));
    }

    #[test]
    fn test_atlas_dimensions_saturate() {
        let huge = AtlasLayout {
            cols: 65536,
            rows: 2,
            cell_width: 65536,
            cell_height: 512,
        };
        assert_eq!(atlas_dimensions(&huge), (u32::MAX, 1024));
    }

    #[test]
    fn test_empty_source_leaves_background() {
        let atlas = pack_atlas(&[solid(0, 0, [9, 9, 9, 255])], &layout(1, 1, 8), BG);
        assert!(atlas.image.pixels().all(|p| p.0 == BG));
        assert_eq!(atlas.slots.len(), 1);
    }

    #[test]
    fn test_packed_cells_fully_cover_background() {
        let images = vec![
            solid(300, 100, [200, 10, 10, 255]),
            solid(80, 400, [10, 200, 10, 255]),
            solid(64, 64, [10, 10, 200, 255]),
            solid(1000, 999, [240, 240, 240, 255]),
        ];
        let atlas = pack_atlas(&images, &layout(2, 2, 64), BG);
        assert_eq!(atlas.image.dimensions(), (128, 128));
        assert!(atlas.image.pixels().all(|p| p.0 != BG));
    }

    #[test]
    fn test_pack_order_is_row_major() {
        let colors = [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 0, 255],
        ];
        let images: Vec<_> = colors.iter().map(|c| solid(16, 16, *c)).collect();
        let atlas = pack_atlas(&images, &layout(2, 2, 16), BG);

        assert_eq!(atlas.image.get_pixel(8, 8).0, colors[0]);
        assert_eq!(atlas.image.get_pixel(24, 8).0, colors[1]);
        assert_eq!(atlas.image.get_pixel(8, 24).0, colors[2]);
        assert_eq!(atlas.image.get_pixel(24, 24).0, colors[3]);
        assert_eq!(atlas.slots[1].col, 1);
        assert_eq!(atlas.slots[2].row, 1);
    }

    #[test]
    fn test_wide_image_is_center_cropped_not_squashed() {
        // Left half red, right half blue, twice as wide as the cell
        let mut pixels = RgbaImage::new(200, 100);
        for (x, _, p) in pixels.enumerate_pixels_mut() {
            *p = if x < 100 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
        }
        let source = SourceImage {
            pixels,
            origin: None,
            placeholder: false,
        };
        let atlas = pack_atlas(&[source], &layout(1, 1, 100), BG);

        // The center crop shows the inner quarters at the original scale
        assert_eq!(atlas.image.get_pixel(0, 50).0, [255, 0, 0, 255]);
        assert_eq!(atlas.image.get_pixel(49, 50).0, [255, 0, 0, 255]);
        assert_eq!(atlas.image.get_pixel(50, 50).0, [0, 0, 255, 255]);
        assert_eq!(atlas.image.get_pixel(99, 50).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_transparent_source_composites_over_background() {
        let images = vec![solid(32, 32, [255, 255, 255, 0])];
        let atlas = pack_atlas(&images, &layout(1, 1, 32), BG);
        assert_eq!(atlas.image.get_pixel(16, 16).0, BG);
    }

    #[test]
    fn test_placeholder_fills_cell() {
        let source = SourceImage {
            pixels: placeholder_image(100, [0x33, 0x33, 0x33, 0xff]),
            origin: None,
            placeholder: true,
        };
        let atlas = pack_atlas(&[source], &layout(2, 1, 256), BG);
        let center = atlas.image.get_pixel(128, 128).0;
        for channel in 0..3 {
            assert!((center[channel] as i32 - 0x33).abs() <= 1);
        }
        assert!(atlas.slots[0].placeholder);
        // The empty second cell keeps the background
        assert_eq!(atlas.image.get_pixel(384, 128).0, BG);
    }

    #[test]
    fn test_overflowing_images_are_dropped() {
        let images: Vec<_> = (0..5).map(|_| solid(8, 8, [1, 2, 3, 255])).collect();
        let atlas = pack_atlas(&images, &layout(2, 2, 8), BG);
        assert_eq!(atlas.slots.len(), 4);
    }
}
