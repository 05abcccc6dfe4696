//! WGSL assembly for the per-pixel realization
//!
//! The program is the generated constant header, the generated uniform struct and
//! the hand-written body, in that order.

use super::transform_data::TRANSFORM_UNIFORM_FIELDS;
use crate::constants::generate_wgsl_constants;

/// Hand-written body of the per-pixel program
pub const TILE_WALL_WGSL: &str = include_str!("../shaders/tile_wall.wgsl");

/// Vertex entry point name
pub const VERTEX_ENTRY: &str = "vs_main";

/// Fragment entry point name
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Fragment entry point writing `image_index + 1` (0 in the gap) to an `R32Uint` target
pub const INDEX_ENTRY: &str = "fs_index";

/// WGSL declaration of `TransformUniform`
pub fn generate_uniform_struct() -> String {
    let mut wgsl = String::new();
    wgsl.push_str("struct TransformUniform {\n");
    for (name, ty) in TRANSFORM_UNIFORM_FIELDS {
        wgsl.push_str(&format!("    {}: {},\n", name, ty));
    }
    wgsl.push_str("}\n");
    wgsl
}

/// Complete WGSL source of the tile wall program
pub fn build_shader_source() -> String {
    let mut wgsl = String::new();

    wgsl.push_str("// AUTO-GENERATED SHADER: tile_wall\n\n");
    wgsl.push_str(&generate_wgsl_constants());
    wgsl.push('\n');
    wgsl.push_str(&generate_uniform_struct());
    wgsl.push('\n');
    wgsl.push_str(TILE_WALL_WGSL);

    wgsl
}

/// Compile the tile wall program for `device`
pub fn create_shader_module(device: &wgpu::Device) -> wgpu::ShaderModule {
    let source = build_shader_source();
    log::debug!(
        "[shader::create_shader_module] Compiling tile_wall ({} bytes)",
        source.len()
    );

    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("tile_wall"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
