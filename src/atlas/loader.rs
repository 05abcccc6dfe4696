//! Source image loading
//!
//! All images decode in parallel; each failure is captured and replaced by the
//! placeholder so the atlas always completes.

use super::atlas_data::SourceImage;
use super::atlas_operations::placeholder_image;
use crate::config::AtlasConfig;
use image::RgbaImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Why a single image could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to decode {path}: {error}")]
    Decode {
        path: String,
        #[source]
        error: image::ImageError,
    },
}

/// Read and decode one image file to RGBA8
pub fn load_image(path: &Path) -> Result<RgbaImage, LoadError> {
    let bytes = std::fs::read(path).map_err(|error| LoadError::Io {
        path: path.display().to_string(),
        error,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|error| LoadError::Decode {
        path: path.display().to_string(),
        error,
    })?;

    Ok(decoded.to_rgba8())
}

/// Load one image, substituting the placeholder on failure
pub fn load_source_image(path: &Path, config: &AtlasConfig) -> SourceImage {
    match load_image(path) {
        Ok(pixels) => {
            log::debug!(
                "[atlas::load_source_image] Loaded {} ({}x{})",
                path.display(),
                pixels.width(),
                pixels.height()
            );
            SourceImage {
                pixels,
                origin: Some(path.to_path_buf()),
                placeholder: false,
            }
        }
        Err(e) => {
            log::warn!("[atlas::load_source_image] {}, using placeholder", e);
            SourceImage {
                pixels: placeholder_image(config.placeholder_size, config.placeholder_color),
                origin: Some(path.to_path_buf()),
                placeholder: true,
            }
        }
    }
}

/// Load every image concurrently; output order matches `paths`
pub fn load_source_images(paths: &[PathBuf], config: &AtlasConfig) -> Vec<SourceImage> {
    let images: Vec<SourceImage> = paths
        .par_iter()
        .map(|path| load_source_image(path, config))
        .collect();

    let failed = images.iter().filter(|image| image.placeholder).count();
    log::info!(
        "[atlas::load_source_images] Resolved {} images ({} placeholders)",
        images.len(),
        failed
    );
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_missing_file_becomes_placeholder() {
        let config = AtlasConfig::default();
        let image = load_source_image(Path::new("/no/such/image.png"), &config);
        assert!(image.placeholder);
        assert_eq!(image.pixels.dimensions(), (100, 100));
        assert_eq!(image.pixels.get_pixel(0, 0).0, [0x33, 0x33, 0x33, 0xff]);
    }

    #[test]
    fn test_undecodable_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_load_preserves_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let red = dir.path().join("red.png");
        let blue = dir.path().join("blue.png");
        RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]))
            .save(&red)
            .unwrap();
        RgbaImage::from_pixel(3, 5, Rgba([0, 0, 255, 255]))
            .save(&blue)
            .unwrap();

        let paths = vec![red, dir.path().join("missing.png"), blue];
        let images = load_source_images(&paths, &AtlasConfig::default());

        assert_eq!(images.len(), 3);
        assert_eq!(images[0].pixels.dimensions(), (4, 2));
        assert!(!images[0].placeholder);
        assert!(images[1].placeholder);
        assert_eq!(images[2].pixels.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }
}
