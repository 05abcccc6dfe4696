//! Renderer Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in renderer_operations.rs

use crate::atlas::AtlasTexture;
use crate::transform::TransformUniform;

/// Drawable size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// GPU state for the per-pixel realization
pub struct RendererData {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    pub uniform_buffer: wgpu::Buffer,
    pub atlas: AtlasTexture,
    /// Last uniform written, to skip redundant uploads
    pub last_uniform: Option<TransformUniform>,
    pub frames_presented: u64,
}
