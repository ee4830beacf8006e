//! Data output writers
//!
//! Both artifacts are written once at the end of a run. Each file is first
//! written to a temporary sibling and then persisted over the target, so a
//! reader never sees a half-written file.

use crate::harvester::HarvestReport;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

pub mod csv;
pub mod json;
pub mod path;

pub use path::OutputPaths;

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Write the JSON document and the CSV file for a finished run
pub fn write_report(report: &HarvestReport, paths: &OutputPaths) -> OutputResult<()> {
    paths.ensure_directory()?;
    json::write_document(paths.json(), report)?;
    csv::write_records(paths.csv(), &report.records)?;
    info!(
        json = %paths.json().display(),
        csv = %paths.csv().display(),
        records = report.records.len(),
        "Output written"
    );
    Ok(())
}

/// Write to a temp file next to `path`, then atomically replace `path`
pub(crate) fn write_atomically<F>(path: &Path, fill: F) -> OutputResult<()>
where
    F: FnOnce(&mut NamedTempFile) -> OutputResult<()>,
{
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| OutputError::IoError(format!("Failed to create temp file: {e}")))?;

    fill(&mut temp_file)?;

    temp_file
        .flush()
        .map_err(|e| OutputError::IoError(format!("Failed to flush temp file: {e}")))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| OutputError::IoError(format!("Failed to sync temp file: {e}")))?;
    temp_file
        .persist(path)
        .map_err(|e| OutputError::IoError(format!("Failed to persist {}: {e}", path.display())))?;
    Ok(())
}
