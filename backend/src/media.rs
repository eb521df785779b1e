//! On-disk storage for uploaded recipe images
//!
//! Files live under the configured media root and are referenced from the
//! database by their path relative to that root. The router serves the root
//! read-only at [`MEDIA_URL_PREFIX`].

use crate::error::ApiError;
use anyhow::{Context, Result};
use image::ImageFormat;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// URL prefix the media root is mounted at
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Sub-directory (relative to the media root) for recipe images
const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// Raster formats accepted for recipe images
const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Upload bytes that are known to decode as a supported image
#[derive(Debug)]
pub struct ValidatedImage {
    bytes: Vec<u8>,
    format: ImageFormat,
}

impl ValidatedImage {
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

/// Check that `bytes` is a complete, decodable raster image.
///
/// Sniffing the magic bytes is not enough: a truncated file with a valid
/// header must also be refused, so the whole image is decoded on the
/// blocking pool.
pub async fn validate_image(bytes: Vec<u8>) -> Result<ValidatedImage, ApiError> {
    const FIELD: &str = "image";

    if bytes.is_empty() {
        return Err(ApiError::field(FIELD, "The submitted file is empty"));
    }

    let format = image::guess_format(&bytes).map_err(|_| {
        ApiError::field(
            FIELD,
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image",
        )
    })?;

    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(ApiError::field(FIELD, format!("Unsupported image format: {:?}", format)));
    }

    tokio::task::spawn_blocking(move || {
        image::load_from_memory_with_format(&bytes, format)
            .map(|_| ValidatedImage { bytes, format })
            .map_err(|e| ApiError::field(FIELD, format!("Could not decode image: {}", e)))
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("Task join error: {}", e)))?
}

/// File store rooted at the configured media directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a recipe image under a fresh unique name, returning its relative path
    pub async fn save_recipe_image(&self, image: &ValidatedImage) -> Result<String> {
        let dir = self.root.join(RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create media directory {}", dir.display()))?;

        let relative = format!("{}/{}.{}", RECIPE_IMAGE_DIR, Uuid::new_v4(), image.extension());
        let path = self.root.join(&relative);
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("Failed to write image {}", path.display()))?;

        debug!(path = %relative, "Stored recipe image");
        Ok(relative)
    }

    /// Delete a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, relative: &str) -> Result<()> {
        let path = self.root.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    /// Public URL for a stored file
    pub fn url_for(relative: &str) -> String {
        format!("{}/{}", MEDIA_URL_PREFIX, relative)
    }
}
