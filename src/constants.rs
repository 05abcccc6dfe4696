//! Shared constants
//!
//! Every number the tile transform depends on lives here exactly once. The host-side
//! evaluation reads these directly and the WGSL program receives them through
//! `generate_wgsl_constants()`, so the two realizations cannot drift apart.

/// Constants used by the tile transform (both realizations)
pub mod transform {
    /// Screen-space center the depth warp is measured from
    pub const CENTER: f32 = 0.5;

    /// Depth value to warp strength factor
    pub const DEPTH_STRENGTH: f32 = 0.3;

    /// Multiplier on the radial distance inside the warp term
    pub const RADIAL_FACTOR: f32 = 2.0;

    /// Gap value to tile inset factor
    pub const GAP_SCALE: f32 = 0.09;

    /// Each axis loses the inset at both of its edges
    pub const INSET_EDGES: f32 = 2.0;

    /// Upper clamp for gap at use; keeps `1 - 2 * gap * GAP_SCALE` well away from zero
    pub const MAX_GAP: f32 = 1.0;

    /// Color multiplier per unit of depth (tunnel darkening)
    pub const DEPTH_DARKENING: f32 = 0.2;

    /// Largest image count the integer selection can scale without overflow
    pub const MAX_IMAGE_COUNT: u32 = 1 << 16;
}

/// Tile hash parameters
pub mod hash {
    /// Multiplier applied to the x tile coordinate
    pub const MUL_X: u32 = 0x8da6_b343;

    /// Multiplier applied to the y tile coordinate
    pub const MUL_Y: u32 = 0xd816_3841;

    /// First avalanche multiplier
    pub const MIX_A: u32 = 0x7feb_352d;

    /// Second avalanche multiplier
    pub const MIX_B: u32 = 0x846c_a68b;

    /// Bits kept from the mixed hash for selection (value range is `0..1 << HASH_BITS`)
    pub const HASH_BITS: u32 = 16;
}

/// Selection policy discriminants as seen by the GPU
pub mod policy {
    pub const RANDOM: u32 = 0;
    pub const POSITIONAL: u32 = 1;
}

/// Momentum defaults
pub mod momentum {
    pub const DRAG_GAIN: f32 = 0.002;
    pub const WHEEL_GAIN: f32 = 0.0002;
    pub const FRICTION: f32 = 0.95;
    pub const GAP_GAIN: f32 = 20.0;
    pub const DEPTH_GAIN: f32 = 15.0;
    pub const GAP_SMOOTHING: f32 = 0.1;
    pub const DEPTH_SMOOTHING: f32 = 0.08;
    /// Pixels per wheel "line" when the platform reports line deltas
    pub const WHEEL_LINE_PIXELS: f32 = 100.0;
    /// Press/release travel (pixels) still counted as a click
    pub const CLICK_TOLERANCE: f32 = 4.0;
}

/// Atlas defaults
pub mod atlas {
    pub const GRID_COLS: u32 = 2;
    pub const GRID_ROWS: u32 = 2;
    pub const CELL_SIZE: u32 = 512;
    /// `#0d0d12`
    pub const BACKGROUND: [u8; 4] = [0x0d, 0x0d, 0x12, 0xff];
    pub const PLACEHOLDER_SIZE: u32 = 100;
    /// `#333`
    pub const PLACEHOLDER_COLOR: [u8; 4] = [0x33, 0x33, 0x33, 0xff];
}

/// Render defaults
pub mod render {
    pub const BASE_REPEAT: f32 = 4.0;
    /// Fill for samples that land in the inter-tile gap
    pub const GAP_FILL: [f32; 4] = [0.05, 0.05, 0.08, 1.0];
    /// Frames between periodic frame diagnostics
    pub const FRAME_LOG_INTERVAL: u64 = 600;
}

/// Host limits
pub mod limits {
    pub const MIN_WINDOW_WIDTH: u32 = 320;
    pub const MIN_WINDOW_HEIGHT: u32 = 240;
    pub const MAX_WINDOW_DIMENSION: u32 = 16384;
    /// Largest packed atlas edge, in pixels
    pub const MAX_ATLAS_DIMENSION: u32 = 16384;
}

/// Format an `f32` as a WGSL `f32` literal that parses back to the same value
fn wgsl_f32(value: f32) -> String {
    // Debug formatting is round-trip exact; the `f` suffix skips the abstract-float detour
    format!("{:?}f", value)
}

/// Generate the WGSL constant header shared by every shader in the crate
pub fn generate_wgsl_constants() -> String {
    let mut wgsl = String::new();

    wgsl.push_str("// AUTO-GENERATED CONSTANTS - DO NOT EDIT\n");
    wgsl.push_str("// Generated from src/constants.rs\n\n");

    let floats = [
        ("CENTER", transform::CENTER),
        ("DEPTH_STRENGTH", transform::DEPTH_STRENGTH),
        ("RADIAL_FACTOR", transform::RADIAL_FACTOR),
        ("GAP_SCALE", transform::GAP_SCALE),
        ("INSET_EDGES", transform::INSET_EDGES),
        ("MAX_GAP", transform::MAX_GAP),
        ("DEPTH_DARKENING", transform::DEPTH_DARKENING),
    ];
    for (name, value) in floats {
        wgsl.push_str(&format!("const {}: f32 = {};\n", name, wgsl_f32(value)));
    }

    let uints = [
        ("HASH_MUL_X", hash::MUL_X),
        ("HASH_MUL_Y", hash::MUL_Y),
        ("HASH_MIX_A", hash::MIX_A),
        ("HASH_MIX_B", hash::MIX_B),
        ("HASH_BITS", hash::HASH_BITS),
        ("POLICY_RANDOM", policy::RANDOM),
        ("POLICY_POSITIONAL", policy::POSITIONAL),
    ];
    for (name, value) in uints {
        wgsl.push_str(&format!("const {}: u32 = {}u;\n", name, value));
    }

    wgsl
}
