//! Configuration type definitions.

use crate::constants::{DEFAULT_SEGMENT_DURATION, DEFAULT_START_TIME};
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// External detector command.
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Default segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Clip duration in seconds.
    pub segment_duration: f64,

    /// Absolute offset at which segmentation begins, seconds.
    pub start_time: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            segment_duration: DEFAULT_SEGMENT_DURATION,
            start_time: DEFAULT_START_TIME,
        }
    }
}

/// External detector command configuration.
///
/// The program is invoked once per clip with `args` followed by the clip
/// path, and must print a JSON array of clip-local detections to stdout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detector program to run. None means the CLI must supply `--detector`.
    pub program: Option<String>,

    /// Fixed arguments passed before the clip path.
    pub args: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.defaults.segment_duration, 30.0);
        assert_eq!(config.defaults.start_time, 0.0);
        assert!(config.detector.program.is_none());
    }
}
