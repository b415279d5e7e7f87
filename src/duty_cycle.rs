//! Duty-cycle clip selection.
//!
//! A duty cycle is a repeating on/off recording pattern: within every
//! `cycle_length_secs` interval (aligned to the recording's absolute time
//! zero) the first `percent_on` fraction is "on" and the rest is "off". The
//! filter keeps the clips a duty-cycled recorder would have captured.

use crate::constants::CYCLE_BOUNDARY_EPSILON;
use crate::error::{Error, Result};
use crate::segment::ClipDescriptor;

/// Duty-cycle parameters, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyCycleConfig {
    /// Cycle period in seconds, always > 0.
    pub cycle_length_secs: f64,
    /// Fraction of each cycle spent recording, in [0, 1].
    pub percent_on: f64,
}

impl DutyCycleConfig {
    /// Create a validated duty-cycle configuration.
    pub fn new(cycle_length_secs: f64, percent_on: f64) -> Result<Self> {
        if !cycle_length_secs.is_finite() || cycle_length_secs <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!("cycle length must be positive, got {cycle_length_secs}"),
            });
        }
        if !percent_on.is_finite() || !(0.0..=1.0).contains(&percent_on) {
            return Err(Error::ConfigValidation {
                message: format!("percent on must be within [0, 1], got {percent_on}"),
            });
        }
        Ok(Self {
            cycle_length_secs,
            percent_on,
        })
    }

    /// Whether the recorder is on for the whole cycle.
    pub fn is_full_duty(self) -> bool {
        self.percent_on >= 1.0
    }

    /// Length of the "on" window at the start of each cycle, in seconds.
    pub fn on_window_secs(self) -> f64 {
        self.cycle_length_secs * self.percent_on
    }
}

/// Select the clips that fall inside the simulated "on" window.
///
/// A clip is kept when it starts exactly at a cycle boundary (the on window
/// always begins there), or when its end falls strictly inside the on window
/// of the next cycle. A clip whose end lands exactly on a boundary has a zero
/// remainder and is not kept by the second test. Input order is preserved and
/// no clip is duplicated.
///
/// At `percent_on == 1.0` the rule degenerates (every instant is "on"), so
/// the filter is bypassed and all clips are returned unchanged.
pub fn filter_clips(clips: Vec<ClipDescriptor>, config: DutyCycleConfig) -> Vec<ClipDescriptor> {
    if config.is_full_duty() {
        return clips;
    }

    clips
        .into_iter()
        .filter(|clip| is_within_on_window(clip, config))
        .collect()
}

/// The duty-cycle decision rule for one clip.
fn is_within_on_window(clip: &ClipDescriptor, config: DutyCycleConfig) -> bool {
    let start_rem = cycle_remainder(clip.offset_seconds, config.cycle_length_secs);
    if start_rem == 0.0 {
        return true;
    }

    let end_rem = cycle_remainder(clip.end_seconds(), config.cycle_length_secs);
    end_rem > 0.0 && end_rem <= config.on_window_secs() + CYCLE_BOUNDARY_EPSILON
}

/// Remainder of `t` within the cycle, snapped to 0 at either boundary.
///
/// Offsets are sample-derived, so a value a float ulp below a boundary must
/// count as the boundary itself for the decision rule to match its integer
/// formulation.
fn cycle_remainder(t: f64, cycle_length: f64) -> f64 {
    let rem = t.rem_euclid(cycle_length);
    if rem < CYCLE_BOUNDARY_EPSILON || cycle_length - rem < CYCLE_BOUNDARY_EPSILON {
        0.0
    } else {
        rem
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn clip(offset: f64, duration: f64) -> ClipDescriptor {
        ClipDescriptor {
            path: PathBuf::from(format!("clip_{offset}.wav")),
            parent_file_id: "rec.wav".to_string(),
            offset_seconds: offset,
            duration_seconds: duration,
        }
    }

    fn kept_offsets(clips: Vec<ClipDescriptor>, config: DutyCycleConfig) -> Vec<f64> {
        filter_clips(clips, config)
            .into_iter()
            .map(|c| c.offset_seconds)
            .collect()
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(DutyCycleConfig::new(0.0, 0.5).is_err());
        assert!(DutyCycleConfig::new(-30.0, 0.5).is_err());
        assert!(DutyCycleConfig::new(60.0, -0.1).is_err());
        assert!(DutyCycleConfig::new(60.0, 1.5).is_err());
        assert!(DutyCycleConfig::new(60.0, f64::NAN).is_err());
    }

    #[test]
    fn test_full_duty_bypasses_filter() {
        let clips: Vec<_> = (0..6).map(|i| clip(f64::from(i) * 30.0, 30.0)).collect();
        let config = DutyCycleConfig::new(60.0, 1.0).unwrap();
        let kept = filter_clips(clips.clone(), config);
        assert_eq!(kept, clips);
    }

    #[test]
    fn test_cycle_boundary_clips_kept() {
        // 60s cycle at 50% with 30s clips: only the clips starting exactly on
        // a cycle boundary are kept; the others end exactly on the next
        // boundary (zero remainder) and are excluded.
        let clips: Vec<_> = (0..6).map(|i| clip(f64::from(i) * 30.0, 30.0)).collect();
        let config = DutyCycleConfig::new(60.0, 0.5).unwrap();
        assert_eq!(kept_offsets(clips, config), vec![0.0, 60.0, 120.0]);
    }

    #[test]
    fn test_straddling_clip_kept() {
        // 30s cycle, 6s on. A 10s clip at offset 26 ends at 36; 36 mod 30 = 6
        // is inside (0, 6], so the clip straddles into the on window.
        let config = DutyCycleConfig::new(30.0, 0.2).unwrap();
        assert_eq!(
            kept_offsets(vec![clip(0.0, 10.0), clip(20.0, 10.0), clip(26.0, 10.0)], config),
            vec![0.0, 26.0],
        );
    }

    #[test]
    fn test_off_region_clips_excluded() {
        // 30s cycle, 6s on, 10s clips at 0,10,20,30: only the boundary clips
        // survive; ends at 20 and 30 are outside (0, 6].
        let clips: Vec<_> = (0..4).map(|i| clip(f64::from(i) * 10.0, 10.0)).collect();
        let config = DutyCycleConfig::new(30.0, 0.2).unwrap();
        assert_eq!(kept_offsets(clips, config), vec![0.0, 30.0]);
    }

    #[test]
    fn test_order_preserved_no_duplicates() {
        let clips: Vec<_> = (0..10).map(|i| clip(f64::from(i) * 30.0, 30.0)).collect();
        let config = DutyCycleConfig::new(60.0, 0.5).unwrap();
        let kept = kept_offsets(clips, config);
        let mut sorted = kept.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        assert_eq!(kept, sorted);
    }

    #[test]
    fn test_near_boundary_offset_snaps() {
        // A sample-derived offset one ulp shy of the boundary still counts
        // as starting on the boundary.
        let config = DutyCycleConfig::new(60.0, 0.5).unwrap();
        assert_eq!(kept_offsets(vec![clip(119.999_999_9, 30.0)], config), vec![119.999_999_9]);
    }
}
