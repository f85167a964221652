#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use crossbeam_channel::bounded;
    use img_resizer::{
        Cli, DirectoryWatcher, ImageProcessor, ProcessConfig, ResizeAlgorithm, ResizeError,
        WatchConfig, WatchState,
    };
    use std::path::Path;
    use std::thread;
    use std::time::{Duration, Instant};

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        img.save(path).unwrap();
    }

    fn config(width: u32, height: u32) -> ProcessConfig {
        ProcessConfig {
            width,
            height,
            ..Default::default()
        }
    }

    /// Poll until `path` decodes far enough to report its dimensions.
    fn wait_for_image(path: &Path, timeout: Duration) -> Option<(u32, u32)> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(dimensions) = image::image_dimensions(path) {
                return Some(dimensions);
            }
            thread::sleep(Duration::from_millis(50));
        }
        None
    }

    /// Move a finished file into the watched directory in one step.
    fn drop_into(staging: &Path, in_dir: &Path, name: &str) {
        std::fs::rename(staging.join(name), in_dir.join(name)).unwrap();
    }

    #[test]
    fn test_resize_keeps_aspect_ratio_for_zero_height() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("landscape.png");
        write_png(input.path(), 400, 300);
        let output = temp_dir.child("small.png");

        let report = ImageProcessor::new(config(200, 0))
            .process(input.path(), output.path())
            .unwrap();

        assert!(output.path().exists());
        assert_eq!(report.output_dimensions, (200, 150));
        assert_eq!(image::image_dimensions(output.path()).unwrap(), (200, 150));
    }

    #[test]
    fn test_resize_keeps_aspect_ratio_for_zero_width() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("landscape.png");
        write_png(input.path(), 400, 300);
        let output = temp_dir.child("small.png");

        ImageProcessor::new(config(0, 60))
            .process(input.path(), output.path())
            .unwrap();

        assert_eq!(image::image_dimensions(output.path()).unwrap(), (80, 60));
    }

    #[test]
    fn test_resize_to_exact_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("landscape.png");
        write_png(input.path(), 400, 300);
        let output = temp_dir.child("square.png");

        let processor = ImageProcessor::new(ProcessConfig {
            width: 64,
            height: 64,
            algorithm: ResizeAlgorithm::Lanczos3,
            ..Default::default()
        });
        processor.process(input.path(), output.path()).unwrap();

        assert_eq!(image::image_dimensions(output.path()).unwrap(), (64, 64));
    }

    #[test]
    fn test_output_format_follows_extension() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("photo.png");
        write_png(input.path(), 120, 80);
        let output = temp_dir.child("photo.jpg");

        ImageProcessor::new(config(60, 0))
            .process(input.path(), output.path())
            .unwrap();

        let format = image::ImageReader::open(output.path())
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        assert_eq!(format, Some(image::ImageFormat::Jpeg));
        assert_eq!(image::image_dimensions(output.path()).unwrap(), (60, 40));
    }

    #[test]
    fn test_zero_width_and_height_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("photo.png");
        write_png(input.path(), 40, 40);
        let output = temp_dir.child("out.png");

        let result = ImageProcessor::new(config(0, 0)).process(input.path(), output.path());

        assert!(matches!(result, Err(ResizeError::InvalidParameter(_))));
        assert!(!output.path().exists());
    }

    #[test]
    fn test_oversized_derived_side_is_refused() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("sliver.png");
        image::GrayImage::new(1, 100_000).save(input.path()).unwrap();
        let output = temp_dir.child("out.png");

        let result = ImageProcessor::new(config(100_000, 0)).process(input.path(), output.path());

        assert!(matches!(result, Err(ResizeError::MemoryLimitExceeded(_))));
        assert!(!output.path().exists());
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.child("output.jpg");

        let result = ImageProcessor::new(ProcessConfig::default())
            .process(temp_dir.child("nonexistent.jpg").path(), output.path());

        assert!(result.is_err());
        assert!(!output.path().exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.child("photo.png");
        write_png(input.path(), 40, 40);

        let result = ImageProcessor::new(ProcessConfig::default())
            .process(input.path(), temp_dir.child("missing/dir/out.png").path());

        assert!(matches!(result, Err(ResizeError::Io(_))));
    }

    #[test]
    fn test_non_integer_width_is_a_parse_error() {
        let result = Cli::parse_args(["imgResizer", "-s", "a.png", "-o", "b.png", "-w", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_request_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let cli = Cli::parse_args(["imgResizer", "--help", "-wm", "true"]).unwrap();
        let config = cli.into_configuration(temp_dir.path());

        assert!(config.show_help);
        assert!(!temp_dir.child("in").path().exists());
        assert!(!temp_dir.child("out").path().exists());
    }

    #[test]
    fn test_watch_mode_resizes_new_files() {
        let temp_dir = TempDir::new().unwrap();
        let staging = temp_dir.child("staging");
        staging.create_dir_all().unwrap();
        let watch = WatchConfig {
            in_dir: temp_dir.child("in").path().to_path_buf(),
            out_dir: temp_dir.child("out").path().to_path_buf(),
            workers: 2,
        };

        let mut watcher = DirectoryWatcher::new(watch.clone(), config(200, 0)).unwrap();
        watcher.start().unwrap();
        assert_eq!(watcher.state(), WatchState::Watching);

        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let handle = thread::spawn(move || watcher.run(&shutdown_rx));

        write_png(&staging.path().join("first.png"), 400, 300);
        write_png(&staging.path().join("second.png"), 800, 200);
        drop_into(staging.path(), &watch.in_dir, "first.png");
        drop_into(staging.path(), &watch.in_dir, "second.png");

        let timeout = Duration::from_secs(15);
        assert_eq!(
            wait_for_image(&watch.out_dir.join("first.png"), timeout),
            Some((200, 150))
        );
        assert_eq!(
            wait_for_image(&watch.out_dir.join("second.png"), timeout),
            Some((200, 50))
        );

        shutdown_tx.send(()).unwrap();
        let summary = handle.join().unwrap().unwrap();
        assert_eq!(summary.processed, 2);
        assert!(summary.is_success());
    }

    #[test]
    fn test_watch_mode_resizes_files_written_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let watch = WatchConfig {
            in_dir: temp_dir.child("in").path().to_path_buf(),
            out_dir: temp_dir.child("out").path().to_path_buf(),
            workers: 2,
        };

        let mut watcher = DirectoryWatcher::new(watch.clone(), config(200, 0)).unwrap();
        watcher.start().unwrap();

        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let handle = thread::spawn(move || watcher.run(&shutdown_rx));

        // Saved straight into the watched directory, no rename
        write_png(&watch.in_dir.join("a.png"), 400, 300);
        image::RgbImage::new(400, 100)
            .save(watch.in_dir.join("b.jpg"))
            .unwrap();

        let timeout = Duration::from_secs(15);
        assert_eq!(
            wait_for_image(&watch.out_dir.join("a.png"), timeout),
            Some((200, 150))
        );
        assert_eq!(
            wait_for_image(&watch.out_dir.join("b.jpg"), timeout),
            Some((200, 50))
        );

        shutdown_tx.send(()).unwrap();
        let summary = handle.join().unwrap().unwrap();
        assert_eq!(summary.processed, 2);
        assert!(summary.is_success());
    }

    #[test]
    fn test_watch_mode_survives_a_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let staging = temp_dir.child("staging");
        staging.create_dir_all().unwrap();
        let watch = WatchConfig {
            in_dir: temp_dir.child("in").path().to_path_buf(),
            out_dir: temp_dir.child("out").path().to_path_buf(),
            workers: 2,
        };

        let mut watcher = DirectoryWatcher::new(watch.clone(), config(50, 0)).unwrap();
        watcher.start().unwrap();

        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let handle = thread::spawn(move || watcher.run(&shutdown_rx));

        staging.child("broken.png").write_binary(b"not an image").unwrap();
        write_png(&staging.path().join("fine.png"), 100, 100);
        drop_into(staging.path(), &watch.in_dir, "broken.png");
        drop_into(staging.path(), &watch.in_dir, "fine.png");

        assert_eq!(
            wait_for_image(&watch.out_dir.join("fine.png"), Duration::from_secs(15)),
            Some((50, 50))
        );

        shutdown_tx.send(()).unwrap();
        let summary = handle.join().unwrap().unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());
        assert!(!watch.out_dir.join("broken.png").exists());
    }
}
