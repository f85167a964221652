pub mod cli;
mod core;
mod processors;
mod utils;

pub use cli::{Algorithm, Cli, PROGRAM_NAME};
pub use crate::core::processor::ImageProcessor;
pub use crate::core::{
    Configuration, ProcessConfig, ResizeAlgorithm, ResizeError, ResizeReport, Result,
    WatchConfig,
};
pub use processors::{
    created_paths, target_dimensions, Compressor, DirectoryWatcher, Loader, ResizeOutcome,
    Resizer, WatchState, WatchSummary, EVENT_BUFFER_CAPACITY,
};
pub use utils::{format_file_size, output_path_for};

pub mod prelude {
    pub use crate::{
        Configuration, DirectoryWatcher, ImageProcessor, ProcessConfig, ResizeAlgorithm,
        WatchConfig, WatchSummary,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
