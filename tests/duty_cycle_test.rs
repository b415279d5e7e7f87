//! Tests pinning the duty-cycle decision rule on worked examples.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use dutysim::duty_cycle::{DutyCycleConfig, filter_clips};
use dutysim::segment::ClipDescriptor;
use std::path::PathBuf;

fn clip(offset: f64, duration: f64) -> ClipDescriptor {
    ClipDescriptor {
        path: PathBuf::from(format!("rec__{offset:.2}_{:.2}.wav", offset + duration)),
        parent_file_id: "rec.WAV".to_string(),
        offset_seconds: offset,
        duration_seconds: duration,
    }
}

fn kept(clips: Vec<ClipDescriptor>, cycle_length: f64, percent_on: f64) -> Vec<f64> {
    let config = DutyCycleConfig::new(cycle_length, percent_on).unwrap();
    filter_clips(clips, config)
        .into_iter()
        .map(|c| c.offset_seconds)
        .collect()
}

#[test]
fn test_full_duty_returns_all_clips_in_order() {
    let clips: Vec<_> = (0..8).map(|i| clip(f64::from(i) * 30.0, 30.0)).collect();
    let config = DutyCycleConfig::new(60.0, 1.0).unwrap();
    let result = filter_clips(clips.clone(), config);
    assert_eq!(result, clips);
}

#[test]
fn test_sixty_second_cycle_half_on() {
    // 30s clips at 0..150 with a 60s cycle at 50%: clips starting on a cycle
    // boundary are kept; clips at 30/90/150 end exactly on the next boundary
    // (zero remainder) and are excluded.
    let clips: Vec<_> = (0..6).map(|i| clip(f64::from(i) * 30.0, 30.0)).collect();
    assert_eq!(kept(clips, 60.0, 0.5), vec![0.0, 60.0, 120.0]);
}

#[test]
fn test_thirty_second_cycle_fifth_on() {
    // 30s cycle with 6s on, 10s clips. Offset 0 starts on a boundary; offset
    // 20 ends at 30 (zero remainder, excluded); offset 30 is the next
    // boundary.
    let clips = vec![clip(0.0, 10.0), clip(10.0, 10.0), clip(20.0, 10.0), clip(30.0, 10.0)];
    assert_eq!(kept(clips, 30.0, 0.2), vec![0.0, 30.0]);
}

#[test]
fn test_clip_straddling_on_window_is_kept() {
    // A clip at offset 26 ends at 36; 36 mod 30 = 6 falls inside (0, 6].
    let clips = vec![clip(26.0, 10.0)];
    assert_eq!(kept(clips, 30.0, 0.2), vec![26.0]);
}

#[test]
fn test_zero_percent_on_keeps_only_boundary_clips() {
    // With nothing "on", only clips starting exactly at a cycle boundary
    // survive the first disjunct.
    let clips: Vec<_> = (0..6).map(|i| clip(f64::from(i) * 10.0, 10.0)).collect();
    assert_eq!(kept(clips, 30.0, 0.0), vec![0.0, 30.0]);
}

#[test]
fn test_truncated_final_clip_participates_normally() {
    // The last clip of a file may be shorter; the rule applies to its true
    // end time.
    let clips = vec![clip(60.0, 30.0), clip(90.0, 12.0)];
    let result = kept(clips, 60.0, 0.5);
    // 90 + 12 = 102; 102 mod 60 = 42 > 30, so only the boundary clip stays.
    assert_eq!(result, vec![60.0]);
}

#[test]
fn test_clips_from_multiple_parents_keep_input_order() {
    let mut clips: Vec<_> = (0..4).map(|i| clip(f64::from(i) * 30.0, 30.0)).collect();
    for c in &mut clips {
        c.parent_file_id = "a.WAV".to_string();
    }
    let mut more: Vec<_> = (0..4).map(|i| clip(f64::from(i) * 30.0, 30.0)).collect();
    for c in &mut more {
        c.parent_file_id = "b.WAV".to_string();
    }
    clips.extend(more);

    let config = DutyCycleConfig::new(60.0, 0.5).unwrap();
    let result = filter_clips(clips, config);
    let parents: Vec<_> = result.iter().map(|c| c.parent_file_id.clone()).collect();
    assert_eq!(parents, vec!["a.WAV", "a.WAV", "b.WAV", "b.WAV"]);
}
