/// Renderer Module - Data-Oriented Programming (DOP) style
///
/// Both per-pixel realizations of the tile transform live here:
/// - renderer_operations.rs: wgpu fullscreen pass on the window surface
/// - offscreen.rs: the same pass into a texture, read back as colors or image indices
/// - software.rs: rayon CPU raster for headless frames
/// - render_loop.rs: per-frame tick and snapshot

pub mod error;
pub mod offscreen;
pub mod render_loop;
pub mod renderer_data;
pub mod renderer_operations;
pub mod software;

pub use error::{RenderError, RenderResult};

pub use renderer_data::{RendererData, Viewport};

pub use renderer_operations::{
    choose_surface_format, create_renderer, render_frame, renderer_viewport, resize_renderer,
};

pub use offscreen::{
    create_headless_device, decode_index_texels, depad_rows, padded_row_bytes,
    render_index_map_gpu, render_offscreen,
};

pub use software::{
    pixel_center_uv, render_software, resolve_index_map, sample_bilinear, shade_pixel,
};

pub use render_loop::{advance_frame, frame_params};
