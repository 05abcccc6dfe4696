/// Transform Module - Data-Oriented Programming (DOP) style
///
/// - transform_data.rs: Pure data structures with NO methods
/// - transform_operations.rs: The tile transform and its helpers
/// - shader.rs: WGSL program for the per-pixel realization

pub mod shader;
pub mod transform_data;
pub mod transform_operations;

pub use transform_data::{
    AtlasGrid, SelectionPolicy, TileLocal, TileResolution, TransformParams, TransformUniform,
    TRANSFORM_UNIFORM_FIELDS,
};

pub use transform_operations::{
    // Parameters
    build_params,
    build_uniform,
    compute_repeat,
    policy_code,

    // Screen space
    pixel_to_uv,

    // Transform
    resolve_tile,

    // Selection
    select_image_index,
    tile_hash,
    tile_hash_bits,

    // Atlas
    atlas_cell,
    atlas_sample_uv,
    atlas_texel_uv,
};

pub use shader::{
    build_shader_source, create_shader_module, FRAGMENT_ENTRY, INDEX_ENTRY, VERTEX_ENTRY,
};
