//! Simulation pipeline components.

mod coordinator;
mod runner;

pub use coordinator::{PipelineOptions, PipelineSummary, collect_input_files, run_pipeline};
pub use runner::{ClipFailure, MappedClip, RunOutcome, correct_offsets, map_clips, run_detections};
