// imgresizer/src/processors/resizer.rs
use crate::core::{ResizeAlgorithm, ResizeError, Result, MAX_DIMENSION, MAX_PIXELS};
use image::{imageops::FilterType, DynamicImage, GenericImageView};

#[derive(Debug, Clone, Copy)]
pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Resize to `width`x`height`. A zero side is derived from the other one
    /// so the source aspect ratio survives; two nonzero sides are exact.
    pub fn resize(&self, image: DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
        let (orig_width, orig_height) = image.dimensions();
        let (width, height) = target_dimensions(orig_width, orig_height, width, height)?;

        if width == orig_width && height == orig_height {
            log::debug!("Image dimensions unchanged, skipping resize");
            return Ok(image);
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            orig_width,
            orig_height,
            width,
            height
        );

        Ok(image.resize_exact(width, height, self.filter_type()))
    }

    fn filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new(ResizeAlgorithm::default())
    }
}

/// The size an image ends up with. A derived side is bounded like a typed
/// one, and the result must stay under `MAX_PIXELS`.
pub fn target_dimensions(
    orig_w: u32,
    orig_h: u32,
    target_w: u32,
    target_h: u32,
) -> Result<(u32, u32)> {
    if orig_w == 0 || orig_h == 0 {
        return Ok((orig_w, orig_h));
    }

    let (width, height) = match (target_w, target_h) {
        (0, 0) => (orig_w as u64, orig_h as u64),
        (0, h) => (scale_side(orig_w, h, orig_h), h as u64),
        (w, 0) => (w as u64, scale_side(orig_h, w, orig_w)),
        (w, h) => (w as u64, h as u64),
    };

    if width > MAX_DIMENSION as u64 || height > MAX_DIMENSION as u64 {
        return Err(ResizeError::MemoryLimitExceeded(format!(
            "Resized image would be {}x{}, max side is {}",
            width, height, MAX_DIMENSION
        )));
    }

    if width * height > MAX_PIXELS {
        return Err(ResizeError::MemoryLimitExceeded(format!(
            "Resized image would be {}x{}, over {} pixels",
            width, height, MAX_PIXELS
        )));
    }

    Ok((width as u32, height as u32))
}

/// `side * numerator / denominator`, rounded, never below 1.
fn scale_side(side: u32, numerator: u32, denominator: u32) -> u64 {
    let scaled = side as f64 * numerator as f64 / denominator as f64;
    (scaled.round() as u64).max(1)
}
