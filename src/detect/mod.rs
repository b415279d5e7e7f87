//! Call-detector capability.
//!
//! The detection model is an external collaborator: anything that can take a
//! clip path and return per-clip detections in clip-local time. The pipeline
//! only depends on the [`CallDetector`] trait; the shipping implementation
//! shells out to a user-configured command.

mod command;

pub use command::CommandDetector;

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// A detection as reported by the detector, in clip-local seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDetection {
    /// Call start within the clip, seconds.
    pub start_time: f64,
    /// Call end within the clip, seconds.
    pub end_time: f64,
    /// Lower bound of the call's frequency span, Hz.
    pub low_freq: f64,
    /// Upper bound of the call's frequency span, Hz.
    pub high_freq: f64,
    /// Model-assigned label for the event.
    pub label: String,
}

impl RawDetection {
    /// Check the detector honored its time contract for this row.
    pub fn time_fields_valid(&self) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.start_time < self.end_time
    }
}

/// A call-detection model invoked once per clip.
pub trait CallDetector {
    /// Run detection on one clip, returning detections in clip-local time.
    fn detect(&self, clip_path: &Path) -> Result<Vec<RawDetection>>;
}
