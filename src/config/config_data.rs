//! Configuration data - Pure DOP
//!
//! NO METHODS. Just data.
//! Loading and validation happen in config_operations.rs

use crate::constants;
use crate::transform::SelectionPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, usually read from a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WallConfig {
    pub window: WindowConfig,
    pub atlas: AtlasConfig,
    pub momentum: MomentumConfig,
    pub transform: TransformConfig,
    /// Ordered image catalog; position in this list is the logical image index
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Atlas grid and packing colors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub cols: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// RGBA fill painted under every cell before drawing
    pub background: [u8; 4],
    /// Edge length of the square substituted for an image that fails to load
    pub placeholder_size: u32,
    pub placeholder_color: [u8; 4],
}

/// Gains and factors driving the momentum controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Offset units per pointer pixel while dragging
    pub drag_gain: f32,
    /// Velocity impulse per wheel pixel
    pub wheel_gain: f32,
    /// Velocity multiplier applied once per idle tick
    pub friction: f32,
    pub gap_gain: f32,
    pub depth_gain: f32,
    pub gap_smoothing: f32,
    pub depth_smoothing: f32,
    pub wheel_line_pixels: f32,
    pub click_tolerance: f32,
}

/// Tile transform and per-pixel styling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Tiles across the shorter viewport axis
    pub base_repeat: f32,
    pub policy: SelectionPolicy,
    pub gap_fill: [f32; 4],
    pub depth_darkening: f32,
}

/// One entry of the image catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub path: PathBuf,
    /// Identifier surfaced on click; defaults to the file stem
    #[serde(default)]
    pub id: Option<String>,
    /// External link surfaced on click
    #[serde(default)]
    pub link: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tile Wall".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            cols: constants::atlas::GRID_COLS,
            rows: constants::atlas::GRID_ROWS,
            cell_width: constants::atlas::CELL_SIZE,
            cell_height: constants::atlas::CELL_SIZE,
            background: constants::atlas::BACKGROUND,
            placeholder_size: constants::atlas::PLACEHOLDER_SIZE,
            placeholder_color: constants::atlas::PLACEHOLDER_COLOR,
        }
    }
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            drag_gain: constants::momentum::DRAG_GAIN,
            wheel_gain: constants::momentum::WHEEL_GAIN,
            friction: constants::momentum::FRICTION,
            gap_gain: constants::momentum::GAP_GAIN,
            depth_gain: constants::momentum::DEPTH_GAIN,
            gap_smoothing: constants::momentum::GAP_SMOOTHING,
            depth_smoothing: constants::momentum::DEPTH_SMOOTHING,
            wheel_line_pixels: constants::momentum::WHEEL_LINE_PIXELS,
            click_tolerance: constants::momentum::CLICK_TOLERANCE,
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            base_repeat: constants::render::BASE_REPEAT,
            policy: SelectionPolicy::default(),
            gap_fill: constants::render::GAP_FILL,
            depth_darkening: constants::transform::DEPTH_DARKENING,
        }
    }
}
