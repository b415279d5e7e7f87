//! Dutysim - duty-cycled recording simulation for bioacoustic call detection.
//!
//! Simulates an intermittent ("duty-cycled") field recorder on top of
//! continuously-recorded audio: recordings are cut into fixed-duration clips,
//! the clips a duty-cycled recorder would have captured are selected, an
//! external call-detection model runs on each retained clip, and the
//! detections are merged into one absolute-time CSV table.

#![warn(missing_docs)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detect;
pub mod duty_cycle;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod segment;

use clap::Parser;
use cli::{Cli, Command, ConfigAction, RunArgs};
use config::Config;
use detect::CommandDetector;
use duty_cycle::DutyCycleConfig;
use pipeline::PipelineOptions;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

pub use error::{Error, Result};

/// Cooperative cancellation flag set by the Ctrl+C handler.
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Main entry point for the dutysim CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.run.verbose, cli.run.quiet);

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    let config = config::load_default_config()?;
    let summary = simulate(cli.run, &config)?;

    if summary.cancelled {
        std::process::exit(130); // 128 + SIGINT(2)
    }

    Ok(())
}

/// Run one simulation from CLI arguments and loaded configuration.
fn simulate(args: RunArgs, config: &Config) -> Result<pipeline::PipelineSummary> {
    let (Some(input_dir), Some(csv_filename), Some(output_dir), Some(temp_dir)) = (
        args.input_dir,
        args.csv_filename,
        args.output_dir,
        args.temp_dir,
    ) else {
        return Err(Error::ConfigValidation {
            message:
                "expected positional arguments: input_dir csv_filename output_dir temp_dir cycle_length percent_on"
                    .to_string(),
        });
    };
    let (Some(cycle_length), Some(percent_on)) = (args.cycle_length, args.percent_on) else {
        return Err(Error::ConfigValidation {
            message: "expected positional arguments: cycle_length percent_on".to_string(),
        });
    };

    // Configuration errors are fatal before any file I/O.
    let duty_cycle = DutyCycleConfig::new(cycle_length, percent_on)?;

    let detector = build_detector(args.detector, args.detector_args, config)?;

    if let Err(e) = ctrlc::set_handler(|| CANCELLED.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    let options = PipelineOptions {
        input_dir,
        csv_filename,
        output_dir,
        temp_dir,
        segment_duration: args
            .segment_duration
            .unwrap_or(config.defaults.segment_duration),
        start_time: args.start_time.unwrap_or(config.defaults.start_time),
        fail_fast: args.fail_fast,
        progress_enabled: !args.quiet && !args.no_progress,
    };

    pipeline::run_pipeline(&options, duty_cycle, &detector, &CANCELLED)
}

/// Resolve the detector command from CLI arguments, falling back to config.
fn build_detector(
    cli_program: Option<String>,
    cli_args: Vec<String>,
    config: &Config,
) -> Result<CommandDetector> {
    if let Some(program) = cli_program {
        return Ok(CommandDetector::new(program, cli_args));
    }

    let program = config
        .detector
        .program
        .clone()
        .ok_or_else(|| Error::ConfigValidation {
            message: "no detector command configured (use --detector or set [detector] program in config)"
                .to_string(),
        })?;

    Ok(CommandDetector::new(program, config.detector.args.clone()))
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

#[allow(clippy::print_stdout)]
fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => match action {
            ConfigAction::Init => {
                let path = config::config_file_path()?;
                if path.exists() {
                    println!("Configuration file already exists: {}", path.display());
                } else {
                    let saved = config::save_default_config(&Config::default())?;
                    println!("Created configuration file: {}", saved.display());
                    println!("\nNext steps:");
                    println!("  set [detector] program to your call-detection command");
                }
                Ok(())
            }
            ConfigAction::Show => {
                let config = config::load_default_config()?;
                println!("{config:#?}");
                Ok(())
            }
            ConfigAction::Path => {
                let path = config::config_file_path()?;
                println!("{}", path.display());
                Ok(())
            }
        },
    }
}
