//! Aggregate detections table (CSV).

use crate::constants::table::{HEADER, TIME_DECIMALS};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One detection in absolute recording time.
///
/// Rows are immutable once appended to the table; `source_file` identifies
/// the original recording, not the clip the detector saw.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Call start, seconds from the start of the original recording.
    pub start_time: f64,
    /// Call end, seconds from the start of the original recording.
    pub end_time: f64,
    /// Lower bound of the call's frequency span, Hz.
    pub low_freq: f64,
    /// Upper bound of the call's frequency span, Hz.
    pub high_freq: f64,
    /// Model-assigned label for the event.
    pub label: String,
    /// Display name of the original recording.
    pub source_file: String,
}

/// CSV writer for the aggregate detections table.
pub struct TableWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl TableWriter {
    /// Create the table file, truncating any previous run's output.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| Error::TableWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Write the header row.
    pub fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "{HEADER}").map_err(|e| self.write_err(e))
    }

    /// Append one detection row.
    pub fn write_detection(&mut self, detection: &Detection) -> Result<()> {
        writeln!(
            self.writer,
            "{:.prec$},{:.prec$},{},{},{},{}",
            detection.start_time,
            detection.end_time,
            detection.low_freq,
            detection.high_freq,
            escape_csv(&detection.label),
            escape_csv(&detection.source_file),
            prec = TIME_DECIMALS,
        )
        .map_err(|e| self.write_err(e))
    }

    /// Flush buffered rows to disk.
    pub fn finalize(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| self.write_err(e))
    }

    fn write_err(&self, source: std::io::Error) -> Error {
        Error::TableWrite {
            path: self.path.clone(),
            source,
        }
    }
}

/// Persist the full table in one call: header, rows, flush.
pub fn write_table(path: &Path, detections: &[Detection]) -> Result<()> {
    let mut writer = TableWriter::create(path)?;
    writer.write_header()?;
    for detection in detections {
        writer.write_detection(detection)?;
    }
    writer.finalize()
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
