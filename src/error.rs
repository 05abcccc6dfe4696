//! Error handling for the tile wall
//!
//! One crate-wide error type. Renderer errors convert into it so host code only
//! ever sees `WallResult`; image load failures never surface, they become
//! placeholders.

use std::error::Error as StdError;
use std::fmt;

/// Main error type for the tile wall
#[derive(Debug)]
pub enum WallError {
    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },
    ConfigParse {
        path: String,
        error: String,
    },

    // Resource Errors
    IoError {
        path: String,
        error: String,
    },

    // GPU Errors
    DeviceNotFound,
    SurfaceCreation {
        error: String,
    },
    SurfaceLost,
    ShaderCompilation {
        error: String,
    },

    // Host Errors
    WindowCreation {
        error: String,
    },
    EventLoop {
        error: String,
    },

    // Generic fallback for unexpected errors
    Internal {
        message: String,
    },
}

impl fmt::Display for WallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WallError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),
            WallError::ConfigParse { path, error } => {
                write!(f, "Config parse failed for {}: {}", path, error)
            }

            WallError::IoError { path, error } => write!(f, "IO error for {}: {}", path, error),

            WallError::DeviceNotFound => write!(f, "GPU device not found"),
            WallError::SurfaceCreation { error } => {
                write!(f, "Surface creation failed: {}", error)
            }
            WallError::SurfaceLost => write!(f, "Rendering surface lost"),
            WallError::ShaderCompilation { error } => {
                write!(f, "Shader compilation failed: {}", error)
            }

            WallError::WindowCreation { error } => write!(f, "Window creation failed: {}", error),
            WallError::EventLoop { error } => write!(f, "Event loop error: {}", error),

            WallError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl StdError for WallError {}

/// Type alias for Results in the tile wall
pub type WallResult<T> = Result<T, WallError>;

impl From<toml::de::Error> for WallError {
    fn from(error: toml::de::Error) -> Self {
        WallError::ConfigParse {
            path: String::new(),
            error: error.to_string(),
        }
    }
}

impl From<crate::renderer::RenderError> for WallError {
    fn from(error: crate::renderer::RenderError) -> Self {
        use crate::renderer::RenderError;
        match error {
            RenderError::AdapterNotFound => WallError::DeviceNotFound,
            RenderError::Surface(e) => WallError::SurfaceCreation {
                error: e.to_string(),
            },
            RenderError::Device(e) => WallError::SurfaceCreation {
                error: e.to_string(),
            },
            RenderError::UnsupportedSurface => WallError::SurfaceCreation {
                error: "surface is not supported by the adapter".to_string(),
            },
            RenderError::Pipeline(error) => WallError::ShaderCompilation { error },
            RenderError::Lost => WallError::SurfaceLost,
            RenderError::Readback(message) => WallError::Internal { message },
        }
    }
}

// Helper functions for common error patterns

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_wall<F>(self, f: F) -> WallResult<T>
    where
        F: FnOnce() -> WallError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_wall<F>(self, f: F) -> WallResult<T>
    where
        F: FnOnce() -> WallError,
    {
        self.ok_or_else(f)
    }
}
