// imgresizer/src/core/mod.rs
pub mod processor;

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 100;
pub const DEFAULT_HEIGHT: u32 = 0;
pub const DEFAULT_QUALITY: u8 = 85;
pub const MAX_DIMENSION: u32 = 100_000;
/// Upper bound on a resized image, about 1 GiB of RGBA.
pub const MAX_PIXELS: u64 = 268_435_456;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
    Lanczos3,
}

/// Resize parameters shared by every operation of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessConfig {
    /// Target width, 0 derives it from the height and the source aspect ratio.
    pub width: u32,
    /// Target height, 0 derives it from the width and the source aspect ratio.
    pub height: u32,
    /// Encoder quality, only meaningful for JPEG output.
    pub quality: u8,
    pub algorithm: ResizeAlgorithm,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            quality: DEFAULT_QUALITY,
            algorithm: ResizeAlgorithm::default(),
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 && self.height == 0 {
            return Err(ResizeError::InvalidParameter(
                "Width and height cannot both be 0".to_string(),
            ));
        }

        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(ResizeError::InvalidParameter(format!(
                "Dimensions too large (max {} pixels)",
                MAX_DIMENSION
            )));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(ResizeError::InvalidParameter(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

/// Everything the command line can ask for, fixed once parsing is done.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub source_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub watch_mode: bool,
    pub watch_in_dir: PathBuf,
    pub watch_out_dir: PathBuf,
    pub show_help: bool,
    pub quality: u8,
    pub algorithm: ResizeAlgorithm,
    /// Resize worker threads in watch mode, 0 lets rayon pick one per CPU.
    pub workers: usize,
    pub verbose: bool,
}

impl Configuration {
    pub fn process_config(&self) -> ProcessConfig {
        ProcessConfig {
            width: self.width,
            height: self.height,
            quality: self.quality,
            algorithm: self.algorithm,
        }
    }

    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig {
            in_dir: self.watch_in_dir.clone(),
            out_dir: self.watch_out_dir.clone(),
            workers: self.workers,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    pub in_dir: PathBuf,
    pub out_dir: PathBuf,
    pub workers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeReport {
    pub source_dimensions: (u32, u32),
    pub output_dimensions: (u32, u32),
    pub size_before: u64,
    pub size_after: u64,
}

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Memory limit exceeded: {0}")]
    MemoryLimitExceeded(String),
}

pub type Result<T> = std::result::Result<T, ResizeError>;
