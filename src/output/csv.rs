//! CSV writer for enriched records
//!
//! Fixed column subset, one row per record, same order as the JSON document.
//! Fields outside the subset (e.g. `company_profile`) appear only in JSON.

use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use super::{write_atomically, OutputError, OutputResult};
use crate::EnrichedRecord;

/// CSV header, in column order
pub const CSV_COLUMNS: [&str; 7] = [
    "job_posting_date",
    "job_position",
    "company_name",
    "job_location",
    "job_id",
    "job_link",
    "description",
];

/// CSV row for an enriched record
#[derive(Debug, Serialize)]
struct RecordRow<'a> {
    job_posting_date: &'a str,
    job_position: &'a str,
    company_name: &'a str,
    job_location: &'a str,
    job_id: &'a str,
    job_link: &'a str,
    description: &'a str,
}

impl<'a> From<&'a EnrichedRecord> for RecordRow<'a> {
    fn from(record: &'a EnrichedRecord) -> Self {
        Self {
            job_posting_date: record.job_posting_date.as_deref().unwrap_or_default(),
            job_position: record.job_position.as_deref().unwrap_or_default(),
            company_name: record.company_name.as_deref().unwrap_or_default(),
            job_location: record.job_location.as_deref().unwrap_or_default(),
            job_id: &record.job_id,
            job_link: record.job_link.as_deref().unwrap_or_default(),
            description: &record.description,
        }
    }
}

/// Write all records to `path`, replacing any existing file.
///
/// The header row is written even when there are no records.
pub fn write_records(path: &Path, records: &[EnrichedRecord]) -> OutputResult<()> {
    debug!(path = %path.display(), records = records.len(), "Writing CSV");
    write_atomically(path, |file| {
        // Header is written explicitly so it appears for empty runs too
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .write_record(CSV_COLUMNS)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        for record in records {
            writer
                .serialize(RecordRow::from(record))
                .map_err(|e| OutputError::CsvError(format!("Failed to write record: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| OutputError::IoError(format!("Failed to flush CSV: {e}")))
    })
}
