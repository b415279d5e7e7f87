//! Audio decoding support.

mod decode;

pub use decode::{DecodedRecording, decode_recording};
