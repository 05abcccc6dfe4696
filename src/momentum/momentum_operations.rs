//! Momentum operations - Pure DOP functions
//!
//! Event handlers and the per-frame step, all against a single `ViewState` owner.
//! Events are applied in arrival order on one thread.

use super::momentum_data::{DragPhase, PointerRelease, ViewState};
use crate::config::MomentumConfig;
use glam::Vec2;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Fresh view at the origin, at rest
pub fn init_view_state() -> ViewState {
    ViewState::default()
}

/// View starting at a given offset
pub fn init_view_state_at(offset: Vec2) -> ViewState {
    ViewState {
        offset,
        ..Default::default()
    }
}

pub fn is_dragging(view: &ViewState) -> bool {
    view.phase == DragPhase::Dragging
}

// ============================================================================
// POINTER EVENTS
// ============================================================================

/// Idle -> Dragging: anchor the pointer and stop any inertia
pub fn pointer_down(view: &mut ViewState, position: Vec2) {
    view.phase = DragPhase::Dragging;
    view.last_pointer = position;
    view.press_origin = position;
    view.press_travel = 0.0;
    view.velocity = Vec2::ZERO;
}

/// Drag the wall; ignored unless dragging
pub fn pointer_move(view: &mut ViewState, position: Vec2, config: &MomentumConfig) {
    if !is_dragging(view) {
        return;
    }

    let delta = position - view.last_pointer;

    // Screen y grows downward, offset y grows upward
    view.velocity = Vec2::new(delta.x * config.drag_gain, -delta.y * config.drag_gain);
    view.offset += view.velocity;
    view.last_pointer = position;
    view.press_travel = view.press_travel.max(position.distance(view.press_origin));
}

/// Dragging -> Idle; short presses are reported as clicks
pub fn pointer_up(view: &mut ViewState, position: Vec2, config: &MomentumConfig) -> PointerRelease {
    if !is_dragging(view) {
        return PointerRelease::Ignored;
    }
    view.phase = DragPhase::Idle;

    let travel = view.press_travel.max(position.distance(view.press_origin));
    if travel <= config.click_tolerance {
        PointerRelease::Click(position)
    } else {
        PointerRelease::DragEnd
    }
}

/// Dragging -> Idle when the pointer leaves the surface; never a click
pub fn pointer_leave(view: &mut ViewState) {
    view.phase = DragPhase::Idle;
}

/// Wheel impulse in pixels, applied in any phase
pub fn wheel(view: &mut ViewState, delta: Vec2, config: &MomentumConfig) {
    view.velocity.x += delta.x * config.wheel_gain;
    view.velocity.y -= delta.y * config.wheel_gain;
}

// ============================================================================
// FRAME STEP
// ============================================================================

/// One frame of inertia; a no-op while dragging
pub fn apply_inertia(view: &mut ViewState, config: &MomentumConfig) {
    if is_dragging(view) {
        return;
    }
    view.offset += view.velocity;
    view.velocity *= config.friction;
}

pub fn speed(view: &ViewState) -> f32 {
    view.velocity.length()
}

/// Ease gap and depth toward their speed-driven targets
pub fn update_intensities(view: &mut ViewState, config: &MomentumConfig) {
    let speed = speed(view);
    let target_gap = (speed * config.gap_gain).min(1.0);
    let target_depth = (speed * config.depth_gain).min(1.0);

    view.current_gap += (target_gap - view.current_gap) * config.gap_smoothing;
    view.current_depth += (target_depth - view.current_depth) * config.depth_smoothing;

    view.current_gap = view.current_gap.clamp(0.0, 1.0);
    view.current_depth = view.current_depth.clamp(0.0, 1.0);
}

/// Full per-frame step: inertia, then smoothing. One call per frame, whatever its length.
pub fn tick(view: &mut ViewState, config: &MomentumConfig) {
    apply_inertia(view, config);
    update_intensities(view, config);
    view.ticks += 1;
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Log view context for debugging
pub fn log_view_context(view: &ViewState) {
    log::debug!(
        "[Momentum] Offset: ({:.3}, {:.3}) | Velocity: ({:.5}, {:.5}) | Phase: {:?} | Gap: {:.3} | Depth: {:.3} | Ticks: {}",
        view.offset.x,
        view.offset.y,
        view.velocity.x,
        view.velocity.y,
        view.phase,
        view.current_gap,
        view.current_depth,
        view.ticks
    );
}
