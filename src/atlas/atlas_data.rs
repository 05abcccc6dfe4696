//! Texture Atlas Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in atlas_operations.rs

use image::RgbaImage;
use std::path::PathBuf;

/// A decoded source image, or the placeholder standing in for one
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub pixels: RgbaImage,
    /// Where it was loaded from, if anywhere
    pub origin: Option<PathBuf>,
    /// True when loading failed and `pixels` is the flat placeholder
    pub placeholder: bool,
}

/// Grid shape and cell size of an atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub cols: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

/// Cover-fit window of one source image, in source pixels
///
/// The window has the cell's aspect ratio and is centered on the longer axis;
/// resizing it to the cell size fills the cell without distortion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One occupied atlas cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasSlot {
    pub image_index: u32,
    pub col: u32,
    pub row: u32,
    pub placeholder: bool,
}

/// Packed atlas - immutable once built
#[derive(Debug, Clone)]
pub struct AtlasData {
    pub image: RgbaImage,
    pub layout: AtlasLayout,
    /// Row-major, indexed by logical image index
    pub slots: Vec<AtlasSlot>,
}
