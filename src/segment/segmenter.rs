//! Clip segmentation with sample-accurate boundaries.

use crate::audio::DecodedRecording;
use crate::error::{Error, Result};
use crate::segment::naming::clip_file_name;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Descriptor for one clip cut from a parent recording.
///
/// `offset_seconds` is measured from the start of the original recording,
/// not from the segmentation start time. Clips from one parent are produced
/// in strictly increasing offset order and are contiguous; only the final
/// clip may be shorter than the configured duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipDescriptor {
    /// Where the clip WAV was written.
    pub path: PathBuf,
    /// Display name of the parent recording (filename with extension).
    pub parent_file_id: String,
    /// Absolute clip start in seconds.
    pub offset_seconds: f64,
    /// Clip length in seconds, always > 0.
    pub duration_seconds: f64,
}

impl ClipDescriptor {
    /// Absolute clip end in seconds.
    pub fn end_seconds(&self) -> f64 {
        self.offset_seconds + self.duration_seconds
    }
}

/// Split a decoded recording into consecutive fixed-duration clips.
///
/// Segmentation starts at `start_time` seconds (audio before it is ignored)
/// and cuts `duration`-second clips in samples; the final clip is truncated
/// to the remaining samples. Each clip is written to `output_dir` as 16-bit
/// PCM WAV under a deterministic name; a clip whose target file already
/// exists is not rewritten, so re-segmenting is idempotent. Descriptors are
/// returned in ascending time order, including for clips that were skipped
/// on disk.
///
/// Returns an empty vec when `start_time` is at or past the end of the
/// recording.
pub fn segment_recording(
    parent: &Path,
    recording: &DecodedRecording,
    output_dir: &Path,
    start_time: f64,
    duration: f64,
) -> Result<Vec<ClipDescriptor>> {
    if duration <= 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("segment duration must be positive, got {duration}"),
        });
    }
    if start_time < 0.0 {
        return Err(Error::ConfigValidation {
            message: format!("start time must not be negative, got {start_time}"),
        });
    }

    let sample_rate = f64::from(recording.sample_rate);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clip_start = (start_time * sample_rate) as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clip_samples = (duration * sample_rate) as usize;
    if clip_samples == 0 {
        return Err(Error::ConfigValidation {
            message: format!("segment duration {duration}s is shorter than one sample"),
        });
    }

    let total_samples = recording.samples.len();
    if clip_start >= total_samples {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(output_dir).map_err(|e| Error::OutputDirCreate {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let parent_file_id = parent
        .file_name()
        .map_or_else(|| "recording".to_string(), |n| n.to_string_lossy().into_owned());
    let parent_stem = parent
        .file_stem()
        .map_or_else(|| "recording".to_string(), |s| s.to_string_lossy().into_owned());

    let mut clips = Vec::new();
    let mut sub_start = clip_start;

    while sub_start < total_samples {
        let sub_end = (sub_start + clip_samples).min(total_samples);

        #[allow(clippy::cast_precision_loss)]
        let start_secs = sub_start as f64 / sample_rate;
        #[allow(clippy::cast_precision_loss)]
        let end_secs = sub_end as f64 / sample_rate;

        let path = output_dir.join(clip_file_name(&parent_stem, start_secs, end_secs));

        if path.exists() {
            debug!("Clip exists, not rewriting: {}", path.display());
        } else {
            write_clip_wav(
                &path,
                &recording.samples[sub_start..sub_end],
                recording.sample_rate,
            )?;
        }

        clips.push(ClipDescriptor {
            path,
            parent_file_id: parent_file_id.clone(),
            offset_seconds: start_secs,
            duration_seconds: end_secs - start_secs,
        });

        sub_start += clip_samples;
    }

    Ok(clips)
}

/// Write samples to a 16-bit PCM WAV file.
fn write_clip_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| Error::ClipWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let sample_i16 = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| Error::ClipWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    writer.finalize().map_err(|e| Error::ClipWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
