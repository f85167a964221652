// imgresizer/src/utils/mod.rs
use crate::core::{ResizeError, Result};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Where a file picked up from the watched directory is written to.
pub fn output_path_for(source: &Path, out_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        ResizeError::InvalidParameter(format!("Invalid file name: {}", source.display()))
    })?;

    Ok(out_dir.join(file_name))
}

/// Block until `path` has kept the same nonzero length across one `interval`,
/// giving up after `timeout`. A creation event fires before the writer is
/// done, so this keeps a half-written file from being decoded.
pub fn wait_until_settled(path: &Path, interval: Duration, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let mut last_len = None;

    loop {
        let len = std::fs::metadata(path).ok().map(|m| m.len());
        if let (Some(prev), Some(now)) = (last_len, len) {
            if prev == now && now > 0 {
                return true;
            }
        }

        if Instant::now() >= deadline {
            return false;
        }

        last_len = len;
        thread::sleep(interval);
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}
