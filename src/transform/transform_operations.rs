//! Tile transform operations - Pure DOP functions
//!
//! `resolve_tile` is the one host-side definition of the transform. The click path
//! calls it directly and the software renderer calls it once per pixel. The WGSL
//! program in `shaders/tile_wall.wgsl` repeats it statement by statement, reading its
//! numbers from the generated constant header, so keep the two in the same order.

use super::transform_data::{
    AtlasGrid, SelectionPolicy, TileLocal, TileResolution, TransformParams, TransformUniform,
};
use crate::config::TransformConfig;
use crate::constants::{self, hash, transform as k};
use glam::{IVec2, UVec2, Vec2};

// ============================================================================
// PARAMETERS
// ============================================================================

/// Tiling density for a viewport; the shorter axis always gets `base` tiles
pub fn compute_repeat(base: f32, width: u32, height: u32) -> Vec2 {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    let aspect = width / height;

    if aspect > 1.0 {
        Vec2::new(base * aspect, base)
    } else {
        Vec2::new(base, base / aspect)
    }
}

/// Build the transform snapshot. Gap and depth are clamped here and again at use.
pub fn build_params(
    repeat: Vec2,
    offset: Vec2,
    gap: f32,
    depth: f32,
    image_count: u32,
    grid: AtlasGrid,
    policy: SelectionPolicy,
) -> TransformParams {
    TransformParams {
        repeat,
        offset,
        gap: gap.clamp(0.0, k::MAX_GAP),
        depth: depth.clamp(0.0, 1.0),
        image_count,
        grid,
        policy,
    }
}

/// Pack a snapshot into the GPU uniform layout
pub fn build_uniform(params: &TransformParams, style: &TransformConfig) -> TransformUniform {
    TransformUniform {
        gap_fill: style.gap_fill,
        offset: params.offset.to_array(),
        repeat: params.repeat.to_array(),
        gap: params.gap,
        depth: params.depth,
        darkening: style.depth_darkening,
        image_count: params.image_count,
        policy: policy_code(params.policy),
        atlas_cols: params.grid.cols,
        atlas_rows: params.grid.rows,
        pad: 0,
    }
}

/// GPU discriminant for a selection policy
pub fn policy_code(policy: SelectionPolicy) -> u32 {
    match policy {
        SelectionPolicy::Random => constants::policy::RANDOM,
        SelectionPolicy::Positional => constants::policy::POSITIONAL,
    }
}

// ============================================================================
// SCREEN SPACE
// ============================================================================

/// Device pixel position (origin top-left) to screen UV (origin bottom-left)
pub fn pixel_to_uv(x: f32, y: f32, width: u32, height: u32) -> Vec2 {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    Vec2::new(x / width, 1.0 - y / height)
}

// ============================================================================
// THE TRANSFORM
// ============================================================================

/// Resolve a screen UV to its tile, local coordinate and image
pub fn resolve_tile(params: &TransformParams, uv: Vec2) -> TileResolution {
    let center = Vec2::splat(k::CENTER);

    // 1. distance from the view center
    let centered = uv - center;
    let dist = (centered.x * centered.x + centered.y * centered.y).sqrt();

    // 2. radial depth warp
    let depth_strength = params.depth.clamp(0.0, 1.0) * k::DEPTH_STRENGTH;
    let warped = centered * (1.0 - depth_strength * dist * k::RADIAL_FACTOR) + center;

    // 3. tile space
    let tiled = warped * params.repeat + params.offset;

    // 4-5. integer tile and fractional position inside it
    let tile_floor = tiled.floor();
    let tile_index = IVec2::new(tile_floor.x as i32, tile_floor.y as i32);
    let tile_local = tiled - tile_floor;

    // 6. gap inset
    let gap_scale = params.gap.clamp(0.0, k::MAX_GAP) * k::GAP_SCALE;
    let scaled = if gap_scale > 0.0 {
        (tile_local - center) / (1.0 - k::INSET_EDGES * gap_scale) + center
    } else {
        tile_local
    };

    // 7. margin
    if scaled.x < 0.0 || scaled.x > 1.0 || scaled.y < 0.0 || scaled.y > 1.0 {
        return TileResolution {
            tile_index,
            local: TileLocal::OutOfGap,
            image_index: None,
            atlas_cell: None,
            atlas_uv: None,
        };
    }

    // 8-9. image and atlas cell
    let image_index = select_image_index(
        params.policy,
        tile_index,
        params.image_count,
        params.grid.cols,
    );
    let cell = atlas_cell(image_index, params.grid);

    TileResolution {
        tile_index,
        local: TileLocal::Inside(scaled),
        image_index: Some(image_index),
        atlas_cell: Some(cell),
        atlas_uv: Some(atlas_sample_uv(cell, scaled, params.grid)),
    }
}

// ============================================================================
// IMAGE SELECTION
// ============================================================================

/// Integer avalanche hash of a tile, `HASH_BITS` wide
pub fn tile_hash_bits(tile: IVec2) -> u32 {
    let mut h = (tile.x as u32).wrapping_mul(hash::MUL_X) ^ (tile.y as u32).wrapping_mul(hash::MUL_Y);
    h ^= h >> 16;
    h = h.wrapping_mul(hash::MIX_A);
    h ^= h >> 15;
    h = h.wrapping_mul(hash::MIX_B);
    h ^= h >> 16;
    h >> (32 - hash::HASH_BITS)
}

/// Tile hash as a value in [0, 1)
pub fn tile_hash(tile: IVec2) -> f32 {
    tile_hash_bits(tile) as f32 / (1u32 << hash::HASH_BITS) as f32
}

/// Pick the image for a tile. `image_count` must be in `1..=MAX_IMAGE_COUNT`.
pub fn select_image_index(
    policy: SelectionPolicy,
    tile: IVec2,
    image_count: u32,
    atlas_cols: u32,
) -> u32 {
    let count = image_count.clamp(1, k::MAX_IMAGE_COUNT);
    match policy {
        // floor(hash * count), in integers
        SelectionPolicy::Random => (tile_hash_bits(tile) * count) >> hash::HASH_BITS,
        SelectionPolicy::Positional => {
            let n = count as i32;
            let calc = tile.x.wrapping_add(tile.y.wrapping_mul(atlas_cols as i32));
            (((calc % n) + n) % n) as u32
        }
    }
}

// ============================================================================
// ATLAS
// ============================================================================

/// Row-major atlas cell for an image index (row 0 is the top row)
pub fn atlas_cell(image_index: u32, grid: AtlasGrid) -> UVec2 {
    let cols = grid.cols.max(1);
    UVec2::new(image_index % cols, image_index / cols)
}

/// Bottom-up atlas coordinate of a local tile coordinate inside `cell`
pub fn atlas_sample_uv(cell: UVec2, local: Vec2, grid: AtlasGrid) -> Vec2 {
    let cols = grid.cols.max(1) as f32;
    let rows = grid.rows.max(1) as f32;
    Vec2::new(
        (cell.x as f32 + local.x) / cols,
        (rows - 1.0 - cell.y as f32 + local.y) / rows,
    )
}

/// Bottom-up sampling coordinate to top-down texel space
pub fn atlas_texel_uv(sample_uv: Vec2) -> Vec2 {
    Vec2::new(sample_uv.x, 1.0 - sample_uv.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(repeat: Vec2, offset: Vec2, gap: f32, depth: f32) -> TransformParams {
        build_params(
            repeat,
            offset,
            gap,
            depth,
            4,
            AtlasGrid { cols: 2, rows: 2 },
            SelectionPolicy::Random,
        )
    }

    #[test]
    fn test_repeat_keeps_density_on_short_axis() {
        assert_eq!(compute_repeat(4.0, 800, 800), Vec2::new(4.0, 4.0));
        assert_eq!(compute_repeat(4.0, 1600, 800), Vec2::new(8.0, 4.0));
        assert_eq!(compute_repeat(4.0, 800, 1600), Vec2::new(4.0, 8.0));
    }

    #[test]
    fn test_center_resolves_to_tile_two_two() {
        let p = params(Vec2::splat(4.0), Vec2::ZERO, 0.0, 0.0);
        let res = resolve_tile(&p, Vec2::splat(0.5));
        assert_eq!(res.tile_index, IVec2::new(2, 2));
        assert_eq!(res.local, TileLocal::Inside(Vec2::ZERO));
        assert!(res.image_index.is_some());
    }

    #[test]
    fn test_zero_gap_never_out_of_gap() {
        let p = params(Vec2::new(7.3, 4.1), Vec2::new(-12.77, 3.001), 0.0, 0.6);
        for iy in 0..=64 {
            for ix in 0..=64 {
                let uv = Vec2::new(ix as f32 / 64.0, iy as f32 / 64.0);
                let res = resolve_tile(&p, uv);
                match res.local {
                    TileLocal::Inside(local) => {
                        // With no gap the scaled coordinate is the raw fractional part
                        let warped_tile = {
                            let centered = uv - Vec2::splat(0.5);
                            let dist = centered.length();
                            let w = centered * (1.0 - p.depth * 0.3 * dist * 2.0) + Vec2::splat(0.5);
                            w * p.repeat + p.offset
                        };
                        assert_eq!(local, warped_tile - warped_tile.floor());
                    }
                    TileLocal::OutOfGap => panic!("gap=0 produced OutOfGap at {:?}", uv),
                }
            }
        }
    }

    #[test]
    fn test_full_gap_hits_margin_near_tile_edge() {
        let p = params(Vec2::splat(4.0), Vec2::ZERO, 1.0, 0.0);
        // Just inside tile (2, 2) near its left edge: local x ~ 0.004, inset is 0.09
        let res = resolve_tile(&p, Vec2::new(0.501, 0.625));
        assert_eq!(res.tile_index, IVec2::new(2, 2));
        assert_eq!(res.local, TileLocal::OutOfGap);
        assert_eq!(res.image_index, None);

        // Tile center is always inside
        let res = resolve_tile(&p, Vec2::new(0.625, 0.625));
        assert!(matches!(res.local, TileLocal::Inside(_)));
    }

    #[test]
    fn test_gap_is_clamped_at_use() {
        let mut p = params(Vec2::splat(4.0), Vec2::ZERO, 0.0, 0.0);
        // Bypass build_params to emulate a transient overshoot
        p.gap = 40.0;
        let res = resolve_tile(&p, Vec2::new(0.625, 0.625));
        match res.local {
            TileLocal::Inside(local) => assert!(local.x.is_finite() && local.y.is_finite()),
            TileLocal::OutOfGap => panic!("tile center classified as gap"),
        }
    }

    #[test]
    fn test_negative_offset_floors_toward_negative_infinity() {
        let p = params(Vec2::splat(1.0), Vec2::new(-0.75, -2.25), 0.0, 0.0);
        let res = resolve_tile(&p, Vec2::new(0.5, 0.5));
        assert_eq!(res.tile_index, IVec2::new(-1, -2));
        assert_eq!(res.local, TileLocal::Inside(Vec2::new(0.75, 0.25)));
    }

    #[test]
    fn test_positional_policy_wraps() {
        let idx = select_image_index(SelectionPolicy::Positional, IVec2::new(3, 2), 10, 5);
        assert_eq!(idx, 3);

        // Negative sums normalize into range
        let idx = select_image_index(SelectionPolicy::Positional, IVec2::new(-1, 0), 10, 5);
        assert_eq!(idx, 9);
        let idx = select_image_index(SelectionPolicy::Positional, IVec2::new(-3, -4), 10, 5);
        assert_eq!(idx, 7);
    }

    #[test]
    fn test_random_policy_is_pure_and_in_range() {
        for y in -20..20 {
            for x in -20..20 {
                let tile = IVec2::new(x, y);
                let a = select_image_index(SelectionPolicy::Random, tile, 7, 3);
                let b = select_image_index(SelectionPolicy::Random, tile, 7, 3);
                assert_eq!(a, b);
                assert!(a < 7);

                let h = tile_hash(tile);
                assert!((0.0..1.0).contains(&h));
                assert_eq!(a, (h * 7.0).floor() as u32);
            }
        }
    }

    #[test]
    fn test_random_policy_uses_every_image() {
        let mut seen = [false; 4];
        for y in 0..16 {
            for x in 0..16 {
                let idx = select_image_index(SelectionPolicy::Random, IVec2::new(x, y), 4, 2);
                seen[idx as usize] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_atlas_rows_are_flipped() {
        let grid = AtlasGrid { cols: 2, rows: 2 };
        // Image 0 is top-left: bottom-up v covers the upper half
        let cell = atlas_cell(0, grid);
        assert_eq!(cell, UVec2::new(0, 0));
        assert_eq!(atlas_sample_uv(cell, Vec2::ZERO, grid), Vec2::new(0.0, 0.5));
        assert_eq!(atlas_texel_uv(Vec2::new(0.0, 0.5)), Vec2::new(0.0, 0.5));
        assert_eq!(atlas_texel_uv(atlas_sample_uv(cell, Vec2::ONE, grid)), Vec2::new(0.5, 0.0));

        // Image 3 is bottom-right
        let cell = atlas_cell(3, grid);
        assert_eq!(cell, UVec2::new(1, 1));
        assert_eq!(atlas_sample_uv(cell, Vec2::ZERO, grid), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_uniform_mirrors_params() {
        let p = params(Vec2::new(8.0, 4.0), Vec2::new(1.5, -2.0), 0.25, 0.5);
        let u = build_uniform(&p, &TransformConfig::default());
        assert_eq!(u.repeat, [8.0, 4.0]);
        assert_eq!(u.offset, [1.5, -2.0]);
        assert_eq!(u.gap, 0.25);
        assert_eq!(u.depth, 0.5);
        assert_eq!(u.image_count, 4);
        assert_eq!(u.policy, constants::policy::RANDOM);
        assert_eq!((u.atlas_cols, u.atlas_rows), (2, 2));
    }

    #[test]
    fn test_pixel_to_uv_flips_y() {
        assert_eq!(pixel_to_uv(400.0, 300.0, 800, 600), Vec2::new(0.5, 0.5));
        assert_eq!(pixel_to_uv(0.0, 0.0, 800, 600), Vec2::new(0.0, 1.0));
        assert_eq!(pixel_to_uv(800.0, 600.0, 800, 600), Vec2::new(1.0, 0.0));
    }
}
