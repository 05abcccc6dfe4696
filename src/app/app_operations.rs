//! App Operations - winit host
//!
//! Translates window events into pointer input, drives the momentum controller,
//! routes clicks to the hit tester and draws one frame per redraw.

use super::app_data::{AppData, PointerInput};
use crate::atlas::{
    create_atlas_texture, layout_from_config, load_source_images, pack_atlas, AtlasData,
};
use crate::config::{validate_config, WallConfig};
use crate::error::{WallError, WallResult};
use crate::hit_test::{resolve_click, ClickSelection, SelectionSink};
use crate::momentum::{self, init_view_state, PointerRelease, ViewState};
use crate::renderer::{
    advance_frame, create_headless_device, create_renderer, frame_params, render_frame,
    render_offscreen, render_software, renderer_viewport, resize_renderer, Viewport,
};
use crate::transform::{build_uniform, TransformParams};
use glam::Vec2;
use image::RgbaImage;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

// ============================================================================
// STATE
// ============================================================================

pub fn init_app(config: WallConfig, viewport: Viewport) -> AppData {
    let layout = layout_from_config(&config.atlas);
    AppData {
        config,
        view: init_view_state(),
        layout,
        viewport,
        cursor: None,
        active_touch: None,
        clicks_resolved: 0,
    }
}

/// Images the transform chooses between
pub fn image_count(app: &AppData) -> u32 {
    app.config.images.len() as u32
}

/// Snapshot for the frame about to be drawn
pub fn current_params(app: &AppData) -> TransformParams {
    frame_params(
        &app.view,
        &app.layout,
        image_count(app),
        &app.config.transform,
        app.viewport,
    )
}

/// Track a new drawable size; zero sizes (minimized) keep the old viewport
pub fn set_viewport(app: &mut AppData, viewport: Viewport) {
    if viewport.width > 0 && viewport.height > 0 {
        app.viewport = viewport;
    }
}

// ============================================================================
// INPUT
// ============================================================================

/// Map a window event onto pointer input, tracking cursor and touch state
pub fn translate_window_event(app: &mut AppData, event: &WindowEvent) -> Option<PointerInput> {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            let position = Vec2::new(position.x as f32, position.y as f32);
            app.cursor = Some(position);
            Some(PointerInput::Moved(position))
        }
        WindowEvent::CursorLeft { .. } => {
            app.cursor = None;
            Some(PointerInput::Left)
        }
        WindowEvent::MouseInput {
            state,
            button: MouseButton::Left,
            ..
        } => {
            let position = app.cursor?;
            match state {
                ElementState::Pressed => Some(PointerInput::Pressed(position)),
                ElementState::Released => Some(PointerInput::Released(position)),
            }
        }
        WindowEvent::MouseWheel { delta, .. } => {
            // winit deltas move the content; scrolling the viewport is the opposite sign
            let pixels = match delta {
                MouseScrollDelta::LineDelta(x, y) => {
                    Vec2::new(*x, *y) * app.config.momentum.wheel_line_pixels
                }
                MouseScrollDelta::PixelDelta(position) => {
                    Vec2::new(position.x as f32, position.y as f32)
                }
            };
            Some(PointerInput::Wheel(-pixels))
        }
        WindowEvent::Touch(touch) => {
            let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
            match touch.phase {
                TouchPhase::Started if app.active_touch.is_none() => {
                    app.active_touch = Some(touch.id);
                    Some(PointerInput::Pressed(position))
                }
                TouchPhase::Moved if app.active_touch == Some(touch.id) => {
                    Some(PointerInput::Moved(position))
                }
                TouchPhase::Ended if app.active_touch == Some(touch.id) => {
                    app.active_touch = None;
                    Some(PointerInput::Released(position))
                }
                TouchPhase::Cancelled if app.active_touch == Some(touch.id) => {
                    app.active_touch = None;
                    Some(PointerInput::Left)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Feed one input to the momentum controller; returns the click position, if any
pub fn apply_input(app: &mut AppData, input: PointerInput) -> Option<Vec2> {
    let config = app.config.momentum;
    match input {
        PointerInput::Pressed(position) => {
            momentum::pointer_down(&mut app.view, position);
            None
        }
        PointerInput::Moved(position) => {
            momentum::pointer_move(&mut app.view, position, &config);
            None
        }
        PointerInput::Released(position) => match momentum::pointer_up(&mut app.view, position, &config) {
            PointerRelease::Click(at) => Some(at),
            PointerRelease::DragEnd | PointerRelease::Ignored => None,
        },
        PointerInput::Left => {
            momentum::pointer_leave(&mut app.view);
            None
        }
        PointerInput::Wheel(delta) => {
            momentum::wheel(&mut app.view, delta, &config);
            None
        }
    }
}

/// Resolve a click against the current view
pub fn handle_click(app: &mut AppData, position: Vec2) -> Option<ClickSelection> {
    let selection = resolve_click(
        &app.view,
        &app.layout,
        &app.config.images,
        &app.config.transform,
        app.viewport,
        position,
    )?;
    app.clicks_resolved += 1;
    Some(selection)
}

/// Translate, apply and, for clicks, resolve one window event
pub fn process_window_event(app: &mut AppData, event: &WindowEvent) -> Option<ClickSelection> {
    let input = translate_window_event(app, event)?;
    let position = apply_input(app, input)?;
    handle_click(app, position)
}

// ============================================================================
// HEADLESS
// ============================================================================

fn prepare_still(
    config: &WallConfig,
    view: &ViewState,
    viewport: Viewport,
) -> WallResult<(AtlasData, TransformParams)> {
    validate_config(config)?;

    let paths: Vec<PathBuf> = config.images.iter().map(|entry| entry.path.clone()).collect();
    let layout = layout_from_config(&config.atlas);
    let sources = load_source_images(&paths, &config.atlas);
    let atlas = pack_atlas(&sources, &layout, config.atlas.background);

    let params = frame_params(
        view,
        &layout,
        config.images.len() as u32,
        &config.transform,
        viewport,
    );
    log::info!(
        "[app::render_still] Rendering {}x{} at offset ({:.3}, {:.3})",
        viewport.width,
        viewport.height,
        view.offset.x,
        view.offset.y
    );
    Ok((atlas, params))
}

/// Load, pack and draw a single frame on the CPU, without a window or GPU
pub fn render_still(config: &WallConfig, view: &ViewState, viewport: Viewport) -> WallResult<RgbaImage> {
    let (atlas, params) = prepare_still(config, view, viewport)?;
    Ok(render_software(
        &params,
        &atlas.image,
        viewport.width,
        viewport.height,
        &config.transform,
    ))
}

/// Load, pack and draw a single frame with the GPU program into an offscreen texture
pub fn render_still_gpu(
    config: &WallConfig,
    view: &ViewState,
    viewport: Viewport,
) -> WallResult<RgbaImage> {
    let (atlas, params) = prepare_still(config, view, viewport)?;
    let (device, queue) = pollster::block_on(create_headless_device())?;
    let texture = create_atlas_texture(&device, &queue, &atlas);
    let uniform = build_uniform(&params, &config.transform);
    Ok(render_offscreen(&device, &queue, &texture, &uniform, viewport)?)
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Create the event loop and run the wall until the window closes
pub fn run(config: WallConfig, sink: Box<dyn SelectionSink>) -> WallResult<()> {
    let event_loop = EventLoop::new().map_err(|e| WallError::EventLoop {
        error: e.to_string(),
    })?;
    run_with_event_loop(event_loop, config, sink)
}

/// Run the wall on an existing event loop
pub fn run_with_event_loop(
    event_loop: EventLoop<()>,
    config: WallConfig,
    mut sink: Box<dyn SelectionSink>,
) -> WallResult<()> {
    validate_config(&config)?;

    let window = WindowBuilder::new()
        .with_title(config.window.title.clone())
        .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
        .build(&event_loop)
        .map_err(|e| WallError::WindowCreation {
            error: e.to_string(),
        })?;
    let window = Arc::new(window);

    // Images are resolved before the first frame; failures become placeholders
    let paths: Vec<PathBuf> = config.images.iter().map(|entry| entry.path.clone()).collect();
    let layout = layout_from_config(&config.atlas);
    let sources = load_source_images(&paths, &config.atlas);
    let atlas = pack_atlas(&sources, &layout, config.atlas.background);

    let mut renderer = pollster::block_on(create_renderer(window.clone(), &atlas))?;
    let mut app = init_app(config, renderer_viewport(&renderer));

    log::info!(
        "[app::run] Wall ready: {} images, {}x{} viewport",
        image_count(&app),
        app.viewport.width,
        app.viewport.height
    );

    let failure: Rc<RefCell<Option<WallError>>> = Rc::new(RefCell::new(None));
    let loop_failure = failure.clone();

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    log::info!("[app::run] Close requested");
                    elwt.exit();
                }
                WindowEvent::Resized(size) => {
                    let viewport = Viewport {
                        width: size.width,
                        height: size.height,
                    };
                    resize_renderer(&mut renderer, viewport);
                    set_viewport(&mut app, viewport);
                }
                WindowEvent::RedrawRequested => {
                    advance_frame(&mut app.view, &app.config.momentum);
                    let params = current_params(&app);
                    let uniform = build_uniform(&params, &app.config.transform);

                    if let Err(e) = render_frame(&mut renderer, &uniform) {
                        log::error!("[app::run] Render failed: {}", e);
                        *loop_failure.borrow_mut() = Some(e.into());
                        elwt.exit();
                    }
                }
                other => {
                    if let Some(selection) = process_window_event(&mut app, &other) {
                        sink.on_selection(&selection);
                    }
                }
            },
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        })
        .map_err(|e| WallError::EventLoop {
            error: e.to_string(),
        })?;

    let taken = failure.borrow_mut().take();
    match taken {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
