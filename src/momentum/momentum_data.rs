//! Momentum data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in momentum_operations.rs

use glam::Vec2;

/// Pointer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

/// View state - owned by the momentum controller, read by the render loop and hit tester
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewState {
    /// Cumulative pan in tile-grid units (unbounded)
    pub offset: Vec2,

    /// Offset change per tick
    pub velocity: Vec2,

    pub phase: DragPhase,

    /// Last pointer position seen while dragging (device pixels)
    pub last_pointer: Vec2,

    /// Where the current press started (device pixels)
    pub press_origin: Vec2,

    /// Farthest the pointer has strayed from `press_origin` during this press
    pub press_travel: f32,

    /// Smoothed gap intensity in [0, 1]
    pub current_gap: f32,

    /// Smoothed depth intensity in [0, 1]
    pub current_depth: f32,

    /// Frame ticks applied so far
    pub ticks: u64,
}

/// What a pointer release amounted to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRelease {
    /// Press and release close together: a click at this position
    Click(Vec2),
    /// A drag ended; inertia takes over
    DragEnd,
    /// Release without a matching press
    Ignored,
}
