//! Recording decoding using symphonia.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A fully decoded recording.
///
/// Samples are mono f32 in [-1.0, 1.0]. The segmenter slices this buffer at
/// exact sample positions, so the whole recording is held in memory; field
/// recordings are typically under an hour of single-channel audio.
#[derive(Debug, Clone)]
pub struct DecodedRecording {
    /// Audio samples, mixed down to mono.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl DecodedRecording {
    /// Recording length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode an audio file to mono f32 samples.
///
/// Supports WAV, FLAC, and MP3 input.
pub fn decode_recording(path: &Path) -> Result<DecodedRecording> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        mix_to_mono(&decoded, channels, &mut samples);
    }

    Ok(DecodedRecording {
        samples,
        sample_rate,
    })
}

/// Append a decoded buffer to `output`, averaging channels to mono.
fn mix_to_mono(buffer: &AudioBufferRef, channels: usize, output: &mut Vec<f32>) {
    match buffer {
        AudioBufferRef::F32(buf) => {
            mix_frames(buf.frames(), channels, output, |ch, i| buf.chan(ch)[i]);
        }
        AudioBufferRef::S16(buf) => {
            const I16_NORM: f32 = 32768.0;
            mix_frames(buf.frames(), channels, output, |ch, i| {
                f32::from(buf.chan(ch)[i]) / I16_NORM
            });
        }
        AudioBufferRef::S32(buf) => {
            const I32_NORM: f32 = 2_147_483_648.0;
            #[allow(clippy::cast_precision_loss)]
            mix_frames(buf.frames(), channels, output, |ch, i| {
                buf.chan(ch)[i] as f32 / I32_NORM
            });
        }
        _ => {
            // Other sample formats are not produced by the supported codecs.
        }
    }
}

/// Average `channels` interleaved planes into mono frames.
fn mix_frames<F>(frames: usize, channels: usize, output: &mut Vec<f32>, sample_at: F)
where
    F: Fn(usize, usize) -> f32,
{
    output.reserve(frames);
    if channels == 1 {
        for i in 0..frames {
            output.push(sample_at(0, i));
        }
    } else {
        #[allow(clippy::cast_precision_loss)]
        let scale = 1.0 / channels as f32;
        for i in 0..frames {
            let mut sum = 0.0f32;
            for ch in 0..channels {
                sum += sample_at(ch, i);
            }
            output.push(sum * scale);
        }
    }
}
