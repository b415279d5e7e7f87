//! Clip filename convention.
//!
//! Clips are written as `<stem>__<start:.2f>_<end:.2f>.wav` with start/end in
//! absolute seconds from the beginning of the parent recording. The format
//! exists so absolute timing can be recovered from a filename alone when
//! auditing a temp directory; the pipeline itself carries timing on
//! [`ClipDescriptor`](crate::segment::ClipDescriptor) and never re-derives it
//! from strings.

use crate::constants::clip_name::{EXTENSION, SEPARATOR, TIME_DECIMALS};

/// Build the clip filename for the given parent stem and time range.
///
/// Spaces in the stem are replaced with underscores so the name is safe to
/// pass through shell-based detector commands.
pub fn clip_file_name(parent_stem: &str, start_secs: f64, end_secs: f64) -> String {
    let stem = parent_stem.replace(' ', "_");
    format!(
        "{stem}{SEPARATOR}{start_secs:.prec$}_{end_secs:.prec$}.{EXTENSION}",
        prec = TIME_DECIMALS,
    )
}

/// Timing recovered from a clip filename.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClipName {
    /// Stem of the parent recording (extension stripped).
    pub parent_stem: String,
    /// Absolute clip start in seconds.
    pub start_secs: f64,
    /// Absolute clip end in seconds.
    pub end_secs: f64,
}

/// Parse a clip filename produced by [`clip_file_name`].
///
/// Returns `None` for names that do not follow the convention.
pub fn parse_clip_name(file_name: &str) -> Option<ParsedClipName> {
    let base = file_name.strip_suffix(&format!(".{EXTENSION}"))?;
    // The stem may itself contain the separator, so split at the last one.
    let sep_idx = base.rfind(SEPARATOR)?;
    let (stem, times) = (&base[..sep_idx], &base[sep_idx + SEPARATOR.len()..]);
    let (start, end) = times.split_once('_')?;

    let start_secs: f64 = start.parse().ok()?;
    let end_secs: f64 = end.parse().ok()?;
    if stem.is_empty() || start_secs < 0.0 || end_secs <= start_secs {
        return None;
    }

    Some(ParsedClipName {
        parent_stem: stem.to_string(),
        start_secs,
        end_secs,
    })
}
