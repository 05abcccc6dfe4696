//! Renderer errors

/// Failure acquiring the GPU, presenting to the surface or reading a frame back
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    AdapterNotFound,

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no usable format")]
    UnsupportedSurface,

    #[error("pipeline creation failed: {0}")]
    Pipeline(String),

    #[error("surface lost and could not be recovered")]
    Lost,

    #[error("offscreen readback failed: {0}")]
    Readback(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
