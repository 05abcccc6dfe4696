//! Configuration operations - Pure DOP functions
//!
//! Loading, path resolution and validation of `WallConfig`.

use super::config_data::{ImageEntry, WallConfig};
use crate::constants;
use crate::error::{WallError, WallResult};
use std::path::Path;

/// Parse a configuration from TOML text
pub fn parse_config(text: &str) -> WallResult<WallConfig> {
    let config: WallConfig = toml::from_str(text)?;
    Ok(config)
}

/// Load a configuration file; relative image paths resolve against its directory
pub fn load_config(path: &Path) -> WallResult<WallConfig> {
    log::debug!("[config::load_config] Reading {}", path.display());

    let text = std::fs::read_to_string(path).map_err(|e| WallError::IoError {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;

    let mut config = parse_config(&text).map_err(|e| match e {
        WallError::ConfigParse { error, .. } => WallError::ConfigParse {
            path: path.display().to_string(),
            error,
        },
        other => other,
    })?;

    if let Some(base) = path.parent() {
        resolve_image_paths(&mut config, base);
    }

    log::info!(
        "[config::load_config] Loaded {} images for a {}x{} atlas",
        config.images.len(),
        config.atlas.cols,
        config.atlas.rows
    );
    Ok(config)
}

/// Rewrite relative image paths so they are relative to `base`
pub fn resolve_image_paths(config: &mut WallConfig, base: &Path) {
    for entry in &mut config.images {
        if entry.path.is_relative() {
            entry.path = base.join(&entry.path);
        }
    }
}

/// Identifier reported for an image on click
pub fn image_id(entry: &ImageEntry) -> String {
    match &entry.id {
        Some(id) => id.clone(),
        None => entry
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.path.display().to_string()),
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> WallError {
    WallError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn unit_interval(field: &str, value: f32, inclusive_max: bool) -> WallResult<()> {
    let in_range = value > 0.0 && (value < 1.0 || (inclusive_max && value == 1.0));
    if in_range {
        Ok(())
    } else {
        let reason = if inclusive_max {
            "must be in (0, 1]"
        } else {
            "must be in (0, 1)"
        };
        Err(invalid(field, value, reason))
    }
}

/// Validate configuration parameters
pub fn validate_config(config: &WallConfig) -> WallResult<()> {
    let window = &config.window;
    if window.width < constants::limits::MIN_WINDOW_WIDTH
        || window.height < constants::limits::MIN_WINDOW_HEIGHT
    {
        return Err(invalid(
            "window",
            format!("{}x{}", window.width, window.height),
            "window dimensions too small (min 320x240)",
        ));
    }
    if window.width > constants::limits::MAX_WINDOW_DIMENSION
        || window.height > constants::limits::MAX_WINDOW_DIMENSION
    {
        return Err(invalid(
            "window",
            format!("{}x{}", window.width, window.height),
            "window dimensions too large (max 16384x16384)",
        ));
    }

    let atlas = &config.atlas;
    if atlas.cols == 0 {
        return Err(invalid("atlas.cols", atlas.cols, "must be at least 1"));
    }
    if atlas.rows == 0 {
        return Err(invalid("atlas.rows", atlas.rows, "must be at least 1"));
    }
    if atlas.cell_width == 0 || atlas.cell_height == 0 {
        return Err(invalid(
            "atlas.cell_size",
            format!("{}x{}", atlas.cell_width, atlas.cell_height),
            "cells must be at least 1x1",
        ));
    }
    let atlas_width = atlas.cols.checked_mul(atlas.cell_width);
    let atlas_height = atlas.rows.checked_mul(atlas.cell_height);
    let within_limit = |edge: Option<u32>| {
        edge.map_or(false, |edge| edge <= constants::limits::MAX_ATLAS_DIMENSION)
    };
    if !within_limit(atlas_width) || !within_limit(atlas_height) {
        return Err(invalid(
            "atlas",
            format!(
                "{}x{} cells of {}x{}",
                atlas.cols, atlas.rows, atlas.cell_width, atlas.cell_height
            ),
            "packed atlas too large (max 16384x16384)",
        ));
    }
    if atlas.placeholder_size == 0 {
        return Err(invalid(
            "atlas.placeholder_size",
            atlas.placeholder_size,
            "must be at least 1",
        ));
    }

    let image_count = config.images.len();
    if image_count == 0 {
        return Err(invalid("images", image_count, "at least one image is required"));
    }
    let cells = atlas.cols as usize * atlas.rows as usize;
    if image_count > cells {
        return Err(invalid(
            "images",
            image_count,
            &format!("atlas grid has only {} cells", cells),
        ));
    }
    if image_count > constants::transform::MAX_IMAGE_COUNT as usize {
        return Err(invalid("images", image_count, "at most 65536 images are supported"));
    }

    let momentum = &config.momentum;
    unit_interval("momentum.friction", momentum.friction, false)?;
    unit_interval("momentum.gap_smoothing", momentum.gap_smoothing, true)?;
    unit_interval("momentum.depth_smoothing", momentum.depth_smoothing, true)?;
    if momentum.click_tolerance < 0.0 {
        return Err(invalid(
            "momentum.click_tolerance",
            momentum.click_tolerance,
            "must not be negative",
        ));
    }

    let transform = &config.transform;
    if !(transform.base_repeat > 0.0) {
        return Err(invalid(
            "transform.base_repeat",
            transform.base_repeat,
            "must be positive",
        ));
    }

    log::debug!("[config::validate_config] Configuration validated successfully");
    Ok(())
}
