/// Hit Test Module - Data-Oriented Programming (DOP) style
///
/// - hit_test_data.rs: Click selection and the host sink seam
/// - hit_test_operations.rs: Per-event realization of the tile transform

pub mod hit_test_data;
pub mod hit_test_operations;

pub use hit_test_data::{ClickSelection, LogSelectionSink, SelectionSink};

pub use hit_test_operations::{resolve_click, resolve_position, screen_to_uv};
