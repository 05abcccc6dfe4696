/// Momentum Module - Data-Oriented Programming (DOP) style
///
/// - momentum_data.rs: Pure data structures with NO methods
/// - momentum_operations.rs: Pure functions that operate on data

pub mod momentum_data;
pub mod momentum_operations;

pub use momentum_data::{DragPhase, PointerRelease, ViewState};

pub use momentum_operations::{
    // Initialization
    init_view_state,
    init_view_state_at,
    is_dragging,

    // Pointer events
    pointer_down,
    pointer_leave,
    pointer_move,
    pointer_up,
    wheel,

    // Frame step
    apply_inertia,
    speed,
    tick,
    update_intensities,

    // Diagnostics
    log_view_context,
};
