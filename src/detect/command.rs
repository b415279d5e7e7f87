//! Detector implementation that runs an external command.

use crate::detect::{CallDetector, RawDetection};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Runs a user-configured program once per clip.
///
/// The clip path is appended as the final argument. The program must print a
/// JSON array of clip-local detections to stdout and exit zero; anything else
/// is reported as a detector failure for that clip only.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
}

impl CommandDetector {
    /// Create a detector for the given program and fixed arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The configured program name, for diagnostics.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl CallDetector for CommandDetector {
    fn detect(&self, clip_path: &Path) -> Result<Vec<RawDetection>> {
        debug!(
            "Running detector '{}' on {}",
            self.program,
            clip_path.display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(clip_path)
            .output()
            .map_err(|e| Error::DetectorSpawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::DetectorFailed {
                clip: clip_path.to_path_buf(),
                reason: format!(
                    "exited with {} ({})",
                    output.status,
                    stderr.trim().lines().next().unwrap_or("no stderr"),
                ),
            });
        }

        let detections: Vec<RawDetection> = serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::DetectorOutputParse {
                clip: clip_path.to_path_buf(),
                source: e,
            })?;

        if let Some(bad) = detections.iter().find(|d| !d.time_fields_valid()) {
            return Err(Error::DetectorFailed {
                clip: clip_path.to_path_buf(),
                reason: format!(
                    "malformed detection times (start={}, end={})",
                    bad.start_time, bad.end_time,
                ),
            });
        }

        Ok(detections)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_spawn_error() {
        let detector = CommandDetector::new("dutysim-no-such-detector", vec![]);
        let err = detector.detect(Path::new("clip.wav"));
        assert!(matches!(err, Err(Error::DetectorSpawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_parses_json_detections() {
        // `sh -c '...'` receives the appended clip path as $0.
        let detector = CommandDetector::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"echo '[{"start_time":1.0,"end_time":1.2,"low_freq":20000,"high_freq":40000,"label":"Echolocation"}]'"#
                    .to_string(),
            ],
        );
        let detections = detector.detect(Path::new("clip.wav")).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "Echolocation");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_detector_failure() {
        let detector = CommandDetector::new(
            "sh",
            vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()],
        );
        let err = detector.detect(Path::new("clip.wav"));
        assert!(matches!(err, Err(Error::DetectorFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_garbage_stdout_is_parse_failure() {
        let detector = CommandDetector::new(
            "sh",
            vec!["-c".to_string(), "echo not-json".to_string()],
        );
        let err = detector.detect(Path::new("clip.wav"));
        assert!(matches!(err, Err(Error::DetectorOutputParse { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_inverted_times_are_detector_failure() {
        let detector = CommandDetector::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"echo '[{"start_time":2.0,"end_time":1.0,"low_freq":20000,"high_freq":40000,"label":"x"}]'"#
                    .to_string(),
            ],
        );
        let err = detector.detect(Path::new("clip.wav"));
        assert!(matches!(err, Err(Error::DetectorFailed { .. })));
    }
}
