// imgresizer/src/processors/loader.rs
use crate::core::{ResizeError, Result, MAX_DIMENSION, MAX_PIXELS};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((MAX_DIMENSION, MAX_DIMENSION)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        // Header only, so an oversized image is refused before it is decoded
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()?;

        if let Some((max_w, max_h)) = self.max_dimensions {
            if width > max_w || height > max_h {
                return Err(ResizeError::MemoryLimitExceeded(format!(
                    "Image dimensions {}x{} exceed maximum {}x{}",
                    width, height, max_w, max_h
                )));
            }
        }

        if width as u64 * height as u64 > MAX_PIXELS {
            return Err(ResizeError::MemoryLimitExceeded(format!(
                "Image {}x{} is over {} pixels",
                width, height, MAX_PIXELS
            )));
        }

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                ResizeError::ProcessingError(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let (width, height) = image.dimensions();
        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ResizeError::InvalidParameter(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let metadata = path.metadata()?;
        if !metadata.is_file() {
            return Err(ResizeError::InvalidParameter(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        if metadata.len() == 0 {
            return Err(ResizeError::InvalidParameter(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
