// imgresizer/src/processors/mod.rs
mod compressor;
mod loader;
mod resizer;
mod watcher;

pub use compressor::Compressor;
pub use loader::Loader;
pub use resizer::{target_dimensions, Resizer};
pub use watcher::{
    created_paths, DirectoryWatcher, ResizeOutcome, WatchState, WatchSummary,
    EVENT_BUFFER_CAPACITY,
};
