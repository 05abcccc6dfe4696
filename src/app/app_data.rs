//! App Data - Pure DOP
//!
//! NO METHODS. Just data.
//! Event translation and the event loop live in app_operations.rs

use crate::atlas::AtlasLayout;
use crate::config::WallConfig;
use crate::momentum::ViewState;
use crate::renderer::Viewport;
use glam::Vec2;

/// Host-independent pointer input, in device pixels
///
/// Wheel deltas use the scroll-the-viewport convention: positive y scrolls down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Pressed(Vec2),
    Moved(Vec2),
    Released(Vec2),
    Left,
    Wheel(Vec2),
}

/// Everything the host loop owns apart from the window and GPU
#[derive(Debug, Clone)]
pub struct AppData {
    pub config: WallConfig,
    pub view: ViewState,
    pub layout: AtlasLayout,
    /// Viewport both the frame and the hit test are computed for
    pub viewport: Viewport,
    /// Last known cursor position; winit button events carry none
    pub cursor: Option<Vec2>,
    /// Finger currently driving the wall; other touches are ignored
    pub active_touch: Option<u64>,
    pub clicks_resolved: u64,
}
