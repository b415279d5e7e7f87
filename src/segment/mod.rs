//! Recording segmentation.
//!
//! Splits a long recording into fixed-duration clips with sample-accurate
//! boundaries and writes them to a temp directory for the detector.

pub mod naming;
mod segmenter;

pub use segmenter::{ClipDescriptor, segment_recording};
