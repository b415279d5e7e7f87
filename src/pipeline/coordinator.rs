//! Pipeline orchestration: segment, filter, map, run, persist.

use crate::audio::decode_recording;
use crate::detect::CallDetector;
use crate::duty_cycle::{DutyCycleConfig, filter_clips};
use crate::error::{Error, Result};
use crate::output::{progress, write_table};
use crate::pipeline::{map_clips, run_detections};
use crate::segment::{ClipDescriptor, segment_recording};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

/// Options for one simulation run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory of recordings to process.
    pub input_dir: PathBuf,
    /// Filename of the aggregate detections table.
    pub csv_filename: String,
    /// Directory the table is written to.
    pub output_dir: PathBuf,
    /// Directory clip WAVs are written to.
    pub temp_dir: PathBuf,
    /// Clip duration in seconds.
    pub segment_duration: f64,
    /// Absolute offset at which segmentation begins, seconds.
    pub start_time: f64,
    /// Abort on the first per-clip detector failure.
    pub fail_fast: bool,
    /// Show the clip progress bar.
    pub progress_enabled: bool,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Recordings found in the input directory.
    pub recordings_found: usize,
    /// Recordings that could not be decoded and were skipped.
    pub recordings_failed: usize,
    /// Clips produced by segmentation.
    pub clips_total: usize,
    /// Clips retained by the duty-cycle filter.
    pub clips_retained: usize,
    /// Retained clips the detector was invoked on.
    pub clips_processed: usize,
    /// Retained clips whose detector invocation failed.
    pub clip_failures: usize,
    /// Rows written to the detections table.
    pub detections: usize,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

/// Run the full duty-cycle simulation over one input directory.
///
/// Configuration is validated before any file I/O (the `DutyCycleConfig` is
/// already validated at construction). Unreadable recordings are skipped with
/// an error log; the run is fatal only if no recording could be decoded. The
/// detections table is written after the detector pass, so it only ever
/// claims clips that were actually processed.
pub fn run_pipeline(
    options: &PipelineOptions,
    duty_cycle: DutyCycleConfig,
    detector: &dyn CallDetector,
    cancel: &AtomicBool,
) -> Result<PipelineSummary> {
    let recordings = collect_input_files(&options.input_dir)?;
    info!(
        "Found {} recording(s) in {}",
        recordings.len(),
        options.input_dir.display()
    );

    std::fs::create_dir_all(&options.output_dir).map_err(|e| Error::OutputDirCreate {
        path: options.output_dir.clone(),
        source: e,
    })?;

    // Segment every recording up front; descriptors are cheap and the filter
    // needs the full ordered list.
    let mut clips: Vec<ClipDescriptor> = Vec::new();
    let mut recordings_failed = 0;

    for recording_path in &recordings {
        if cancel.load(Ordering::SeqCst) {
            break;
        }

        match decode_recording(recording_path) {
            Ok(recording) => {
                info!(
                    "Segmenting {} ({:.1}s at {} Hz)",
                    recording_path.display(),
                    recording.duration_secs(),
                    recording.sample_rate,
                );
                clips.extend(segment_recording(
                    recording_path,
                    &recording,
                    &options.temp_dir,
                    options.start_time,
                    options.segment_duration,
                )?);
            }
            Err(e) => {
                error!("Skipping unreadable recording {}: {e}", recording_path.display());
                recordings_failed += 1;
            }
        }
    }

    if recordings_failed == recordings.len() {
        return Err(Error::NoValidAudioFiles);
    }

    let clips_total = clips.len();
    let retained = filter_clips(clips, duty_cycle);
    let clips_retained = retained.len();
    info!(
        "Duty cycle {}s at {:.1}% on: retained {clips_retained} of {clips_total} clips",
        duty_cycle.cycle_length_secs,
        duty_cycle.percent_on * 100.0,
    );

    let mapped = map_clips(retained);
    let clip_progress = progress::create_clip_progress(mapped.len(), options.progress_enabled);
    let outcome = run_detections(
        mapped,
        detector,
        options.fail_fast,
        cancel,
        clip_progress.as_ref(),
    )?;
    progress::finish_progress(
        clip_progress,
        if outcome.cancelled { "Cancelled" } else { "Done" },
    );

    let table_path = options.output_dir.join(&options.csv_filename);
    write_table(&table_path, &outcome.detections)?;
    info!(
        "Wrote {} detection(s) to {}",
        outcome.detections.len(),
        table_path.display()
    );

    for failure in &outcome.failures {
        warn!("Clip failed: {} ({})", failure.clip.display(), failure.message);
    }

    let summary = PipelineSummary {
        recordings_found: recordings.len(),
        recordings_failed,
        clips_total,
        clips_retained,
        clips_processed: outcome.clips_processed,
        clip_failures: outcome.failures.len(),
        detections: outcome.detections.len(),
        cancelled: outcome.cancelled,
    };

    info!(
        "Complete: {} recording(s), {} clips segmented, {} retained, {} processed, {} failed, {} detections{}",
        summary.recordings_found,
        summary.clips_total,
        summary.clips_retained,
        summary.clips_processed,
        summary.clip_failures,
        summary.detections,
        if summary.cancelled { " (cancelled)" } else { "" },
    );

    Ok(summary)
}

/// Collect recordings from the input directory, sorted by name.
///
/// Non-recursive: field deployments drop all recordings of a session into one
/// flat directory.
pub fn collect_input_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(Error::InputDirNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && is_audio_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::NoValidAudioFiles);
    }

    Ok(files)
}

/// Check if a file is a supported audio format.
fn is_audio_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        ext.eq_ignore_ascii_case(OsStr::new("wav"))
            || ext.eq_ignore_ascii_case(OsStr::new("flac"))
            || ext.eq_ignore_ascii_case(OsStr::new("mp3"))
    })
}
