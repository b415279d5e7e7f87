//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Duty-cycled recording simulation for bioacoustic call detection.
#[derive(Debug, Parser)]
#[command(name = "dutysim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for a simulation run.
    #[command(flatten)]
    pub run: RunArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for a simulation run.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Directory of recordings to process.
    pub input_dir: Option<PathBuf>,

    /// Filename of the output detections table (CSV).
    pub csv_filename: Option<String>,

    /// Directory the detections table is written to.
    pub output_dir: Option<PathBuf>,

    /// Temp directory where the audio clips go.
    pub temp_dir: Option<PathBuf>,

    /// Simulated duty-cycle period in seconds.
    #[arg(value_parser = parse_cycle_length)]
    pub cycle_length: Option<f64>,

    /// Fraction of each cycle spent recording (0.0-1.0).
    #[arg(value_parser = parse_percent)]
    pub percent_on: Option<f64>,

    /// Detector command to run per clip (overrides config).
    #[arg(long, env = "DUTYSIM_DETECTOR")]
    pub detector: Option<String>,

    /// Fixed argument passed to the detector before the clip path (repeatable).
    #[arg(long = "detector-arg", allow_hyphen_values = true)]
    pub detector_args: Vec<String>,

    /// Clip duration in seconds (overrides config).
    #[arg(long, value_parser = parse_positive_seconds, env = "DUTYSIM_SEGMENT_DURATION")]
    pub segment_duration: Option<f64>,

    /// Absolute offset at which segmentation begins, seconds (overrides config).
    #[arg(long, value_parser = parse_non_negative_seconds, env = "DUTYSIM_START_TIME")]
    pub start_time: Option<f64>,

    /// Stop on the first per-clip detector failure.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Suppress informational output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse and validate a cycle length value.
fn parse_cycle_length(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("cycle length must be positive, got {value}"));
    }

    Ok(value)
}

/// Parse and validate a percent-on value.
fn parse_percent(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("percent on must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}

/// Parse a strictly positive seconds value.
fn parse_positive_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("duration must be positive, got {value}"));
    }

    Ok(value)
}

/// Parse a non-negative seconds value.
fn parse_non_negative_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value < 0.0 {
        return Err(format!("seconds must not be negative, got {value}"));
    }

    Ok(value)
}
