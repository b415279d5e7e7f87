//! Application-wide constants.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "dutysim";

/// Default clip duration in seconds.
pub const DEFAULT_SEGMENT_DURATION: f64 = 30.0;

/// Default absolute offset (seconds) at which segmentation begins.
pub const DEFAULT_START_TIME: f64 = 0.0;

/// Clip filename constants.
///
/// Clips are named `<stem>__<start:.2f>_<end:.2f>.wav` where start/end are
/// absolute offsets into the parent recording. Consumers may reconstruct
/// timing from the filename alone, so the format is a contract.
pub mod clip_name {
    /// Separator between the parent stem and the time range.
    pub const SEPARATOR: &str = "__";

    /// Decimal places used for start/end seconds.
    pub const TIME_DECIMALS: usize = 2;

    /// Extension for written clips.
    pub const EXTENSION: &str = "wav";
}

/// Tolerance for duty-cycle boundary arithmetic.
///
/// Clip offsets are derived from integer sample positions, but mp3 frame
/// padding and f64 division can leave them a hair off an exact cycle
/// boundary. Remainders within this tolerance of 0 or of the cycle length
/// are treated as landing exactly on the boundary.
pub const CYCLE_BOUNDARY_EPSILON: f64 = 1e-6;

/// Detections table constants.
pub mod table {
    /// CSV header for the aggregate detections table.
    pub const HEADER: &str = "start_time,end_time,low_freq,high_freq,label,source_file";

    /// Decimal places for time columns.
    pub const TIME_DECIMALS: usize = 4;
}
