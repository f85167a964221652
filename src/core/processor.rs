// imgresizer/src/core/processor.rs
use super::{ProcessConfig, ResizeError, ResizeReport, Result};
use crate::processors::{Compressor, Loader, Resizer};
use image::GenericImageView;
use std::path::Path;

/// Load, resize and save one image.
#[derive(Clone)]
pub struct ImageProcessor {
    config: ProcessConfig,
    loader: Loader,
    resizer: Resizer,
    compressor: Compressor,
}

impl ImageProcessor {
    pub fn new(config: ProcessConfig) -> Self {
        let resizer = Resizer::new(config.algorithm);
        let compressor = Compressor::new(config.quality);

        Self {
            config,
            loader: Loader::new(),
            resizer,
            compressor,
        }
    }

    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ResizeReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        self.config.validate()?;
        self.validate_paths(input_path, output_path)?;

        // Resolve the output format before decoding so a bad extension fails fast
        let output_format = self.compressor.detect_format(output_path)?;

        let image = self.loader.load(input_path)?;
        let size_before = std::fs::metadata(input_path)?.len();
        let source_dimensions = image.dimensions();

        let image = self
            .resizer
            .resize(image, self.config.width, self.config.height)?;
        let output_dimensions = image.dimensions();

        let size_after = self
            .compressor
            .save_with_format(&image, output_path, output_format)?;

        Ok(ResizeReport {
            source_dimensions,
            output_dimensions,
            size_before,
            size_after,
        })
    }

    fn validate_paths(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        if input_path.as_os_str().is_empty() {
            return Err(ResizeError::InvalidParameter(
                "No image source given".to_string(),
            ));
        }

        if output_path.as_os_str().is_empty() {
            return Err(ResizeError::InvalidParameter(
                "No output path given".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use tempfile::TempDir;

    fn write_fixture(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn unknown_output_extension_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(dir.path(), "in.png", 40, 30);
        let output = dir.path().join("out.unknown");

        let result = ImageProcessor::new(ProcessConfig::default()).process(&input, &output);

        assert!(matches!(result, Err(ResizeError::UnsupportedFormat(_))));
        assert!(!output.exists());
    }

    #[test]
    fn missing_source_is_reported_once_by_the_loader() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.png");

        let err = ImageProcessor::new(ProcessConfig::default())
            .process(dir.path().join("ghost.png"), &output)
            .unwrap_err();

        assert!(err.to_string().contains("File does not exist"), "{}", err);
        assert!(!output.exists());
    }

    #[test]
    fn empty_paths_are_invalid() {
        let processor = ImageProcessor::new(ProcessConfig::default());
        assert!(matches!(
            processor.process("", "out.png"),
            Err(ResizeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn report_carries_both_sizes() {
        let dir = TempDir::new().unwrap();
        let input = write_fixture(dir.path(), "in.png", 80, 40);
        let output = dir.path().join("out.png");

        let config = ProcessConfig {
            width: 20,
            height: 0,
            ..Default::default()
        };
        let report = ImageProcessor::new(config).process(&input, &output).unwrap();

        assert_eq!(report.source_dimensions, (80, 40));
        assert_eq!(report.output_dimensions, (20, 10));
        assert_eq!(report.size_after, std::fs::metadata(&output).unwrap().len());
    }
}
