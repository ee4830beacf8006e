//! JSON document writer
//!
//! Layout: `{"meta": {...}, "data": [...]}`, pretty-printed, UTF-8 with
//! non-ASCII text kept as-is.

use std::io::Write;
use std::path::Path;
use tracing::debug;

use super::{write_atomically, OutputError, OutputResult};
use crate::harvester::HarvestReport;

/// Serialize `report` to `path`, replacing any existing file
pub fn write_document(path: &Path, report: &HarvestReport) -> OutputResult<()> {
    debug!(path = %path.display(), records = report.records.len(), "Writing JSON document");
    write_atomically(path, |file| {
        serde_json::to_writer_pretty(&mut *file, report)
            .map_err(|e| OutputError::SerializationError(e.to_string()))?;
        file.write_all(b"\n")
            .map_err(|e| OutputError::IoError(e.to_string()))
    })
}

/// Read a document back, used to inspect previous runs
pub fn read_document(path: &Path) -> OutputResult<HarvestReport> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| OutputError::IoError(format!("Failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| OutputError::SerializationError(e.to_string()))
}
