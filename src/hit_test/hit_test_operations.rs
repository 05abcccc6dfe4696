//! Hit test operations - Pure DOP functions
//!
//! Per-event realization of the tile transform: one `resolve_tile` call against the
//! same snapshot the current frame was drawn with.

use super::hit_test_data::ClickSelection;
use crate::atlas::AtlasLayout;
use crate::config::{image_id, ImageEntry, TransformConfig};
use crate::momentum::ViewState;
use crate::renderer::{frame_params, Viewport};
use crate::transform::{pixel_to_uv, resolve_tile, TileResolution};
use glam::Vec2;

/// Device pixel position (origin top-left) to screen UV (origin bottom-left)
pub fn screen_to_uv(position: Vec2, viewport: Viewport) -> Vec2 {
    pixel_to_uv(position.x, position.y, viewport.width, viewport.height)
}

/// Full transform result under a pointer position
pub fn resolve_position(
    view: &ViewState,
    layout: &AtlasLayout,
    image_count: u32,
    config: &TransformConfig,
    viewport: Viewport,
    position: Vec2,
) -> TileResolution {
    let params = frame_params(view, layout, image_count, config, viewport);
    resolve_tile(&params, screen_to_uv(position, viewport))
}

/// Resolve a click to a catalog entry; `None` when it lands in the gap
pub fn resolve_click(
    view: &ViewState,
    layout: &AtlasLayout,
    catalog: &[ImageEntry],
    config: &TransformConfig,
    viewport: Viewport,
    position: Vec2,
) -> Option<ClickSelection> {
    let image_count = catalog.len() as u32;
    let resolution = resolve_position(view, layout, image_count, config, viewport, position);

    let Some(image_index) = resolution.image_index else {
        log::debug!(
            "[hit_test::resolve_click] ({:.1}, {:.1}) in gap of tile ({}, {})",
            position.x,
            position.y,
            resolution.tile_index.x,
            resolution.tile_index.y
        );
        return None;
    };

    let entry = catalog.get(image_index as usize)?;
    let selection = ClickSelection {
        tile_index: resolution.tile_index,
        image_index,
        image_id: image_id(entry),
        link: entry.link.clone(),
    };

    log::debug!(
        "[hit_test::resolve_click] ({:.1}, {:.1}) -> tile ({}, {}) image {}",
        position.x,
        position.y,
        selection.tile_index.x,
        selection.tile_index.y,
        image_index
    );

    Some(selection)
}
