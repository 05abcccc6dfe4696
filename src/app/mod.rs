/// App Module - Data-Oriented Programming (DOP) style
///
/// - app_data.rs: Host state and pointer input
/// - app_operations.rs: Event translation and the winit loop

pub mod app_data;
pub mod app_operations;

pub use app_data::{AppData, PointerInput};

pub use app_operations::{
    // State
    current_params,
    image_count,
    init_app,
    set_viewport,

    // Input
    apply_input,
    handle_click,
    process_window_event,
    translate_window_event,

    // Headless
    render_still,
    render_still_gpu,

    // Loop
    run,
    run_with_event_loop,
};
