// imgresizer/src/processors/compressor.rs
use crate::core::{ResizeError, Result, DEFAULT_QUALITY};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    quality: u8,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Pick the encoder from the output path's extension.
    pub fn detect_format(&self, path: &Path) -> Result<ImageFormat> {
        ImageFormat::from_path(path).map_err(|_| {
            ResizeError::UnsupportedFormat(format!(
                "Cannot tell the output format from: {}",
                path.display()
            ))
        })
    }

    /// Encode fully in memory first so a failed encode never leaves a
    /// truncated file behind. Returns the number of bytes written.
    pub fn save_with_format(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ImageFormat,
    ) -> Result<u64> {
        log::debug!(
            "Saving image to {} with format {:?}, quality: {}",
            path.display(),
            format,
            self.quality
        );

        let data = self.compress_to_bytes(image, format)?;
        std::fs::write(path, &data)?;

        log::debug!("Saved image: {} ({} bytes)", path.display(), data.len());
        Ok(data.len() as u64)
    }

    pub fn compress_to_bytes(&self, image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());

        match format {
            ImageFormat::Jpeg => {
                let image = convert_for_jpeg(image);
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
                image.write_with_encoder(encoder)?;
            }
            ImageFormat::Png | ImageFormat::Tiff => {
                image.write_to(&mut buffer, format)?;
            }
            _ => {
                convert_to_8bit(image).write_to(&mut buffer, format)?;
            }
        }

        Ok(buffer.into_inner())
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY)
    }
}

fn convert_for_jpeg(image: &DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => image.clone(),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

fn convert_to_8bit(image: &DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => image.clone(),
        color if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}
