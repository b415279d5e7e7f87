//! Detector execution and offset reconciliation.

use crate::detect::{CallDetector, RawDetection};
use crate::error::Result;
use crate::output::{Detection, progress};
use crate::segment::ClipDescriptor;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// A retained clip bound to the display name of its parent recording.
#[derive(Debug, Clone)]
pub struct MappedClip {
    /// The clip to run detection on.
    pub clip: ClipDescriptor,
    /// Name written into the `source_file` column of the output table.
    pub parent_display_name: String,
}

/// Bind each retained clip to its parent recording's display name.
///
/// The name comes from the `parent_file_id` the segmenter stamped on the
/// descriptor; the clip filename is never parsed for it.
pub fn map_clips(clips: Vec<ClipDescriptor>) -> Vec<MappedClip> {
    clips
        .into_iter()
        .map(|clip| MappedClip {
            parent_display_name: clip.parent_file_id.clone(),
            clip,
        })
        .collect()
}

/// Translate clip-local detections to absolute recording time.
///
/// Adds the clip's offset to both time fields; no other field changes.
/// Detector output order is preserved.
pub fn correct_offsets(
    raw: Vec<RawDetection>,
    offset_seconds: f64,
    source_file: &str,
) -> Vec<Detection> {
    raw.into_iter()
        .map(|d| Detection {
            start_time: d.start_time + offset_seconds,
            end_time: d.end_time + offset_seconds,
            low_freq: d.low_freq,
            high_freq: d.high_freq,
            label: d.label,
            source_file: source_file.to_string(),
        })
        .collect()
}

/// A per-clip detector failure recorded during a run.
#[derive(Debug, Clone)]
pub struct ClipFailure {
    /// The clip that failed.
    pub clip: PathBuf,
    /// What went wrong.
    pub message: String,
}

/// Result of running the detector over the retained clips.
#[derive(Debug)]
pub struct RunOutcome {
    /// Corrected detections in processing order.
    pub detections: Vec<Detection>,
    /// Clips the detector was actually invoked on.
    pub clips_processed: usize,
    /// Clips whose detector invocation failed; each contributed zero rows.
    pub failures: Vec<ClipFailure>,
    /// Whether the run was cancelled before all clips were processed.
    pub cancelled: bool,
}

/// Run the detector over each mapped clip in order and accumulate
/// absolute-time detections.
///
/// Detector failures are isolated per clip: the failure is recorded, the
/// clip contributes zero detections, and the run continues. With `fail_fast`
/// the first failure aborts the run instead; results accumulated before it
/// are discarded by the caller returning the error. The cancellation flag is
/// checked between clips, so a cancelled run reports only clips it actually
/// processed.
pub fn run_detections(
    mapped: Vec<MappedClip>,
    detector: &dyn CallDetector,
    fail_fast: bool,
    cancel: &AtomicBool,
    clip_progress: Option<&ProgressBar>,
) -> Result<RunOutcome> {
    let mut detections = Vec::new();
    let mut failures = Vec::new();
    let mut clips_processed = 0;
    let mut cancelled = false;

    for mapped_clip in mapped {
        if cancel.load(Ordering::SeqCst) {
            warn!("Cancelled; stopping before remaining clips");
            cancelled = true;
            break;
        }

        let clip = &mapped_clip.clip;
        debug!(
            "Detecting on {} (offset {:.2}s)",
            clip.path.display(),
            clip.offset_seconds,
        );

        match detector.detect(&clip.path) {
            Ok(raw) => {
                detections.extend(correct_offsets(
                    raw,
                    clip.offset_seconds,
                    &mapped_clip.parent_display_name,
                ));
            }
            Err(e) if fail_fast => return Err(e),
            Err(e) => {
                warn!("Detector failed on {}: {e}", clip.path.display());
                failures.push(ClipFailure {
                    clip: clip.path.clone(),
                    message: e.to_string(),
                });
            }
        }

        clips_processed += 1;
        progress::inc_progress(clip_progress);
    }

    Ok(RunOutcome {
        detections,
        clips_processed,
        failures,
        cancelled,
    })
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_map_clips_uses_parent_file_id() {
        let clips = vec![ClipDescriptor {
            path: PathBuf::from("/tmp/20210910_030000__120.00_150.00.wav"),
            parent_file_id: "20210910_030000.WAV".to_string(),
            offset_seconds: 120.0,
            duration_seconds: 30.0,
        }];
        let mapped = map_clips(clips);
        assert_eq!(mapped[0].parent_display_name, "20210910_030000.WAV");
    }

    #[test]
    fn test_correct_offsets_round_trip() {
        let raw = vec![RawDetection {
            start_time: 2.5,
            end_time: 2.61,
            low_freq: 21_000.0,
            high_freq: 48_000.0,
            label: "Echolocation".to_string(),
        }];
        let corrected = correct_offsets(raw, 120.0, "rec.WAV");
        assert_eq!(corrected[0].start_time, 122.5);
        assert_eq!(corrected[0].end_time, 122.61);
        assert_eq!(corrected[0].low_freq, 21_000.0);
        assert_eq!(corrected[0].source_file, "rec.WAV");
    }

    #[test]
    fn test_correct_offsets_preserves_order() {
        let raw = vec![
            RawDetection {
                start_time: 5.0,
                end_time: 5.1,
                low_freq: 0.0,
                high_freq: 1.0,
                label: "b".to_string(),
            },
            RawDetection {
                start_time: 1.0,
                end_time: 1.1,
                low_freq: 0.0,
                high_freq: 1.0,
                label: "a".to_string(),
            },
        ];
        let corrected = correct_offsets(raw, 30.0, "rec.WAV");
        assert_eq!(corrected[0].label, "b");
        assert_eq!(corrected[1].label, "a");
    }
}
