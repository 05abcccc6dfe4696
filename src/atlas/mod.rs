/// Atlas Module - Data-Oriented Programming (DOP) style
///
/// - atlas_data.rs: Pure data structures with NO methods
/// - atlas_operations.rs: Cover-fit packing
/// - loader.rs: Concurrent image loading with placeholder fallback
/// - atlas_texture.rs: GPU upload

pub mod atlas_data;
pub mod atlas_operations;
pub mod atlas_texture;
pub mod loader;

pub use atlas_data::{AtlasData, AtlasLayout, AtlasSlot, SourceCrop, SourceImage};

pub use atlas_operations::{
    atlas_dimensions, atlas_grid, cell_capacity, cell_origin, cover_crop, layout_from_config,
    pack_atlas, placeholder_image,
};

pub use loader::{load_image, load_source_image, load_source_images, LoadError};

pub use atlas_texture::{create_atlas_texture, fit_to_limit, AtlasTexture};
