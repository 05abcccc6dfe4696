/// Config Module - Data-Oriented Programming (DOP) style
///
/// - config_data.rs: Pure data structures with NO methods
/// - config_operations.rs: Pure functions that operate on data

pub mod config_data;
pub mod config_operations;

pub use config_data::{
    AtlasConfig, ImageEntry, MomentumConfig, TransformConfig, WallConfig, WindowConfig,
};

pub use config_operations::{
    image_id, load_config, parse_config, resolve_image_paths, validate_config,
};
