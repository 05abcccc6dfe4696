//! Render loop tick
//!
//! Advances the view by exactly one tick per frame, regardless of how long the
//! frame took, and derives the transform snapshot the frame is drawn with.

use super::renderer_data::Viewport;
use crate::atlas::{atlas_grid, AtlasLayout};
use crate::config::{MomentumConfig, TransformConfig};
use crate::constants;
use crate::momentum::{self, ViewState};
use crate::transform::{build_params, compute_repeat, TransformParams};

/// One frame's worth of momentum integration
pub fn advance_frame(view: &mut ViewState, config: &MomentumConfig) {
    momentum::tick(view, config);

    if view.ticks % constants::render::FRAME_LOG_INTERVAL == 0 {
        momentum::log_view_context(view);
    }
}

/// Transform snapshot for the current view and viewport
///
/// The hit tester builds its snapshot through this same function, so a click is
/// resolved with exactly the parameters of the frame on screen.
pub fn frame_params(
    view: &ViewState,
    layout: &AtlasLayout,
    image_count: u32,
    config: &TransformConfig,
    viewport: Viewport,
) -> TransformParams {
    let repeat = compute_repeat(config.base_repeat, viewport.width, viewport.height);
    build_params(
        repeat,
        view.offset,
        view.current_gap,
        view.current_depth,
        image_count,
        atlas_grid(layout),
        config.policy,
    )
}
