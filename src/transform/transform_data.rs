//! Tile transform data - Pure DOP
//!
//! NO METHODS. Just data.
//! The transform itself lives in transform_operations.rs

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// How a tile picks its image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Pseudo-random per tile, from a hash of the tile coordinates
    #[default]
    Random,
    /// `tile.x + tile.y * atlas_cols`, wrapped into the image range
    Positional,
}

/// Shape of the atlas grid as the transform sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGrid {
    pub cols: u32,
    pub rows: u32,
}

/// Immutable per-evaluation snapshot fed to the transform
///
/// Built once per frame for the render path and once per click for the hit-test
/// path, always by `build_params`, so both see the same clamped values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    /// Tiling density, adjusted for the viewport aspect ratio
    pub repeat: Vec2,

    /// Cumulative pan in tile units
    pub offset: Vec2,

    /// Gap intensity in [0, 1]
    pub gap: f32,

    /// Depth intensity in [0, 1]
    pub depth: f32,

    pub image_count: u32,
    pub grid: AtlasGrid,
    pub policy: SelectionPolicy,
}

/// Where a sample landed inside its tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileLocal {
    /// Gap-scaled local coordinate in [0, 1]^2
    Inside(Vec2),
    /// The sample fell into the margin between tiles
    OutOfGap,
}

/// Output of the tile transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileResolution {
    pub tile_index: IVec2,
    pub local: TileLocal,
    pub image_index: Option<u32>,
    /// Atlas cell holding `image_index`
    pub atlas_cell: Option<UVec2>,
    /// Bottom-up atlas sampling coordinate
    pub atlas_uv: Option<Vec2>,
}

/// Uniform buffer data for the per-pixel program
/// Must match the generated WGSL struct exactly
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    /// RGBA painted where a sample falls into the gap
    pub gap_fill: [f32; 4],
    pub offset: [f32; 2],
    pub repeat: [f32; 2],
    pub gap: f32,
    pub depth: f32,
    /// Darkening per unit of depth
    pub darkening: f32,
    pub image_count: u32,
    pub policy: u32,
    pub atlas_cols: u32,
    pub atlas_rows: u32,
    pub pad: u32,
}

/// WGSL view of `TransformUniform`, field for field
pub const TRANSFORM_UNIFORM_FIELDS: &[(&str, &str)] = &[
    ("gap_fill", "vec4<f32>"),
    ("offset", "vec2<f32>"),
    ("repeat", "vec2<f32>"),
    ("gap", "f32"),
    ("depth", "f32"),
    ("darkening", "f32"),
    ("image_count", "u32"),
    ("policy", "u32"),
    ("atlas_cols", "u32"),
    ("atlas_rows", "u32"),
    ("pad", "u32"),
];

static_assertions::const_assert_eq!(std::mem::size_of::<TransformUniform>(), 64);
static_assertions::const_assert_eq!(std::mem::size_of::<TransformUniform>() % 16, 0);
