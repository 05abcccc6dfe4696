// Tile Wall - Data-Oriented Programming (DOP) Architecture
//
// An endless, pannable wall of image tiles drawn by one fullscreen pass.
// - transform::resolve_tile is the single definition of pixel -> tile -> image
// - the GPU program and the software raster are two realizations of it
// - clicks resolve through the same function with the same snapshot
//
// Each component keeps plain data in *_data.rs and free functions in
// *_operations.rs.

// Constants module
pub mod constants;

// Core
pub mod config;
pub mod error;

// Wall components
pub mod atlas;
pub mod hit_test;
pub mod momentum;
pub mod renderer;
pub mod transform;

// Host
pub mod app;

use winit::event_loop::EventLoop;

pub use config::{load_config, validate_config, ImageEntry, WallConfig};
pub use error::{OptionExt, WallError, WallResult};
pub use hit_test::{ClickSelection, LogSelectionSink, SelectionSink};
pub use momentum::ViewState;
pub use renderer::Viewport;
pub use transform::{resolve_tile, SelectionPolicy, TileLocal, TileResolution, TransformParams};

// Re-export wgpu for hosts that need GPU access
pub use wgpu;

/// Windowed tile wall
pub struct TileWall {
    config: WallConfig,
    event_loop: Option<EventLoop<()>>,
}

impl TileWall {
    /// Validate the configuration and create the event loop
    pub fn new(config: WallConfig) -> WallResult<Self> {
        log::debug!("[TileWall::new] Starting initialization");

        if let Err(e) = validate_config(&config) {
            log::error!("[TileWall::new] Configuration validation failed: {}", e);
            return Err(e);
        }

        let event_loop = EventLoop::new().map_err(|e| {
            log::error!("[TileWall::new] Failed to create event loop: {}", e);
            WallError::EventLoop {
                error: e.to_string(),
            }
        })?;
        log::info!("[TileWall::new] Event loop created successfully");

        Ok(Self {
            config,
            event_loop: Some(event_loop),
        })
    }

    /// Run until the window closes, reporting clicks to `sink`
    pub fn run(mut self, sink: Box<dyn SelectionSink>) -> WallResult<()> {
        log::info!("[TileWall::run] Starting");

        let event_loop = self.event_loop.take().ok_or_wall(|| WallError::Internal {
            message: "event loop already taken".to_string(),
        })?;

        let result = app::run_with_event_loop(event_loop, self.config, sink);

        match &result {
            Ok(_) => log::info!("[TileWall::run] Window closed"),
            Err(e) => log::error!("[TileWall::run] {}", e),
        }

        result
    }
}
