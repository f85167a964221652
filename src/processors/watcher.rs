// imgresizer/src/processors/watcher.rs
use crate::core::processor::ImageProcessor;
use crate::core::{ProcessConfig, ResizeError, ResizeReport, Result, WatchConfig};
use crate::utils::{format_file_size, output_path_for, wait_until_settled};
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Events the notify thread may queue before it blocks on a full channel.
pub const EVENT_BUFFER_CAPACITY: usize = 4096;

const SETTLE_INTERVAL: Duration = Duration::from_millis(50);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
}

/// What one dispatched file turned into.
#[derive(Debug)]
pub struct ResizeOutcome {
    pub source: PathBuf,
    pub output: PathBuf,
    pub result: Result<ResizeReport>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    pub processed: usize,
    pub failed: usize,
}

impl WatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: &ResizeOutcome) {
        match &outcome.result {
            Ok(report) => {
                self.processed += 1;
                log::info!(
                    "Resized {} => {} ({}x{} -> {}x{}, {} -> {})",
                    outcome.source.display(),
                    outcome.output.display(),
                    report.source_dimensions.0,
                    report.source_dimensions.1,
                    report.output_dimensions.0,
                    report.output_dimensions.1,
                    format_file_size(report.size_before),
                    format_file_size(report.size_after)
                );
            }
            Err(e) => {
                self.failed += 1;
                log::error!("{}: {}", outcome.source.display(), e);
            }
        }
    }
}

/// Resizes every file that shows up in `in_dir` into `out_dir`.
///
/// Starts `Idle`; [`DirectoryWatcher::start`] creates both directories and
/// arms the filesystem watcher, after which it stays `Watching` until
/// [`DirectoryWatcher::run`] sees its shutdown channel fire. Each file is
/// resized on a bounded rayon pool and reports back over a channel, so one
/// broken file never stops the others.
pub struct DirectoryWatcher {
    config: WatchConfig,
    processor: ImageProcessor,
    pool: rayon::ThreadPool,
    state: WatchState,
    watcher: Option<RecommendedWatcher>,
    events_tx: Sender<notify::Result<Event>>,
    events: Receiver<notify::Result<Event>>,
}

impl DirectoryWatcher {
    pub fn new(config: WatchConfig, process_config: ProcessConfig) -> Result<Self> {
        process_config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("resize-worker-{}", i))
            .build()
            .map_err(|e| {
                ResizeError::ProcessingError(format!("Failed to create thread pool: {}", e))
            })?;

        let (events_tx, events) = bounded(EVENT_BUFFER_CAPACITY);

        Ok(Self {
            config,
            processor: ImageProcessor::new(process_config),
            pool,
            state: WatchState::Idle,
            watcher: None,
            events_tx,
            events,
        })
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Idle -> Watching. Calling it again once watching is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.state == WatchState::Watching {
            return Ok(());
        }

        ensure_dir(&self.config.in_dir)?;
        ensure_dir(&self.config.out_dir)?;

        let in_dir = std::fs::canonicalize(&self.config.in_dir)?;
        if in_dir == std::fs::canonicalize(&self.config.out_dir)? {
            return Err(ResizeError::InvalidParameter(
                "Watch input and output directories cannot be the same".to_string(),
            ));
        }

        let tx = self.events_tx.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // The receiving side only goes away during shutdown
            let _ = tx.send(res);
        })?;
        watcher.watch(&self.config.in_dir, RecursiveMode::NonRecursive)?;

        self.watcher = Some(watcher);
        self.state = WatchState::Watching;

        log::info!(
            "Watching {} and output will go to {}",
            self.config.in_dir.display(),
            self.config.out_dir.display()
        );

        Ok(())
    }

    /// Process creation events until `shutdown` receives a message or its
    /// sender is dropped, then wait for in-flight resizes and return the tally.
    pub fn run(mut self, shutdown: &Receiver<()>) -> Result<WatchSummary> {
        self.start()?;

        let (outcome_tx, outcome_rx) = unbounded::<ResizeOutcome>();
        let mut summary = WatchSummary::default();
        let mut in_flight = 0usize;

        loop {
            select! {
                recv(self.events) -> msg => match msg {
                    Ok(Ok(event)) => {
                        for source in created_paths(&event) {
                            self.dispatch(source, &outcome_tx);
                            in_flight += 1;
                        }
                    }
                    Ok(Err(e)) => log::warn!("Watcher error: {}", e),
                    Err(_) => break,
                },
                recv(outcome_rx) -> msg => {
                    if let Ok(outcome) = msg {
                        in_flight = in_flight.saturating_sub(1);
                        summary.record(&outcome);
                    }
                },
                recv(shutdown) -> _ => break,
            }
        }

        // Unregisters the inotify/FSEvents watch
        self.watcher.take();

        if in_flight > 0 {
            log::info!("Waiting for {} in-flight resize(s)", in_flight);
        }
        drop(outcome_tx);
        for outcome in outcome_rx.iter() {
            summary.record(&outcome);
        }

        log::debug!(
            "Watch stopped: {} processed, {} failed",
            summary.processed,
            summary.failed
        );

        Ok(summary)
    }

    fn dispatch(&self, source: PathBuf, outcomes: &Sender<ResizeOutcome>) {
        let output = match output_path_for(&source, &self.config.out_dir) {
            Ok(output) => output,
            Err(e) => {
                let _ = outcomes.send(ResizeOutcome {
                    source,
                    output: self.config.out_dir.clone(),
                    result: Err(e),
                });
                return;
            }
        };

        log::info!("Created - File: {} => {}", source.display(), output.display());

        let processor = self.processor.clone();
        let outcomes = outcomes.clone();
        self.pool.spawn(move || {
            if !wait_until_settled(&source, SETTLE_INTERVAL, SETTLE_TIMEOUT) {
                log::debug!("{} did not settle, trying anyway", source.display());
            }

            let result = catch_job_panic(&source, || processor.process(&source, &output));
            let _ = outcomes.send(ResizeOutcome {
                source,
                output,
                result,
            });
        });
    }
}

/// A panic inside a decoder or encoder becomes a failed outcome instead of
/// taking the pool, and with it the watcher, down.
fn catch_job_panic<F>(source: &Path, job: F) -> Result<ResizeReport>
where
    F: FnOnce() -> Result<ResizeReport>,
{
    panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(ResizeError::ProcessingError(format!(
            "Resize of {} panicked: {}",
            source.display(),
            reason
        )))
    })
}

/// Files an event announces as new in the watched directory: plain
/// creations and files renamed in from elsewhere. Directories are skipped.
pub fn created_paths(event: &Event) -> Vec<PathBuf> {
    let is_creation = matches!(
        event.kind,
        EventKind::Create(CreateKind::File)
            | EventKind::Create(CreateKind::Any)
            | EventKind::Modify(ModifyKind::Name(RenameMode::To))
    );

    if !is_creation {
        return Vec::new();
    }

    event
        .paths
        .iter()
        .filter(|path| path.file_name().is_some() && !path.is_dir())
        .cloned()
        .collect()
}

fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|source| ResizeError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Created directory: {}", path.display());

    Ok(())
}
