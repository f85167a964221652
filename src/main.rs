use anyhow::Context;
use crossbeam_channel::bounded;
use img_resizer::cli::{help_text, parse_error_message};
use img_resizer::{
    format_file_size, Cli, Configuration, DirectoryWatcher, ImageProcessor, PROGRAM_NAME,
};
use log::{Level, LevelFilter};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            println!("{}: {}", PROGRAM_NAME, parse_error_message(&err));
            println!("Try '{} --help' for more information", PROGRAM_NAME);
            return ExitCode::FAILURE;
        }
    };

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            println!("{}: Cannot read the current directory: {}", PROGRAM_NAME, e);
            return ExitCode::FAILURE;
        }
    };
    let config = cli.into_configuration(&cwd);

    if config.show_help {
        print!("{}", help_text());
        return ExitCode::SUCCESS;
    }

    init_logger(config.verbose);

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            Level::Error | Level::Warn => {
                writeln!(buf, "{}: {}", PROGRAM_NAME, record.args())
            }
            _ => writeln!(buf, "{}", record.args()),
        })
        .init();
}

/// `Ok(false)` means the run finished but something failed along the way.
fn run(config: &Configuration) -> anyhow::Result<bool> {
    log::debug!("Configuration: {:?}", config);

    if config.watch_mode {
        run_watch(config)
    } else {
        Ok(run_single(config))
    }
}

fn run_single(config: &Configuration) -> bool {
    let source = config.source_path.clone().unwrap_or_default();
    let output = config.output_path.clone().unwrap_or_default();

    let processor = ImageProcessor::new(config.process_config());
    match processor.process(&source, &output) {
        Ok(report) => {
            log::info!(
                "Resized image saved to: {} ({}x{}, {})",
                output.display(),
                report.output_dimensions.0,
                report.output_dimensions.1,
                format_file_size(report.size_after)
            );
            true
        }
        Err(e) => {
            log::error!("{}", e);
            false
        }
    }
}

fn run_watch(config: &Configuration) -> anyhow::Result<bool> {
    let mut watcher = DirectoryWatcher::new(config.watch_config(), config.process_config())
        .context("Invalid resize settings")?;
    watcher.start().context("Failed to start watch mode")?;

    // Never signalled, so watch mode lasts until the process is killed
    let (_shutdown_tx, shutdown_rx) = bounded::<()>(1);
    let summary = watcher.run(&shutdown_rx)?;

    Ok(summary.is_success())
}
