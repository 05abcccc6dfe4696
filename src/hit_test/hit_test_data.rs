//! Hit test data - Pure DOP
//!
//! NO METHODS. Just data, plus the sink seam the host implements.

use glam::IVec2;

/// A click that landed on an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickSelection {
    pub tile_index: IVec2,
    pub image_index: u32,
    pub image_id: String,
    pub link: Option<String>,
}

/// Host callback receiving resolved clicks
///
/// Clicks that land in the gap never reach the sink.
pub trait SelectionSink {
    fn on_selection(&mut self, selection: &ClickSelection);
}

/// Sink that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSelectionSink;

impl SelectionSink for LogSelectionSink {
    fn on_selection(&mut self, selection: &ClickSelection) {
        log::info!(
            "[hit_test] Selected '{}' (image {}, tile ({}, {})){}",
            selection.image_id,
            selection.image_index,
            selection.tile_index.x,
            selection.tile_index.y,
            selection
                .link
                .as_deref()
                .map(|link| format!(" -> {}", link))
                .unwrap_or_default()
        );
    }
}

impl<F> SelectionSink for F
where
    F: FnMut(&ClickSelection),
{
    fn on_selection(&mut self, selection: &ClickSelection) {
        self(selection)
    }
}
