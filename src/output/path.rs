//! Output file naming
//!
//! Names follow the window: a whole calendar month gives
//! `li_jobs_2025-07_with_desc.{json,csv}`, any other range gives
//! `li_jobs_2025-07-01_to_2025-07-15_with_desc.{json,csv}`.

use super::{OutputError, OutputResult};
use crate::window::DateWindow;
use std::path::{Path, PathBuf};

/// File name prefix shared by both artifacts
pub const FILE_PREFIX: &str = "li_jobs";

/// Paths of the two artifacts of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    dir: PathBuf,
    json: PathBuf,
    csv: PathBuf,
}

impl OutputPaths {
    /// Derive both paths for a window under `dir`
    pub fn for_window(dir: impl Into<PathBuf>, window: &DateWindow) -> Self {
        let dir = dir.into();
        let stem = file_stem(window);
        Self {
            json: dir.join(format!("{stem}.json")),
            csv: dir.join(format!("{stem}.csv")),
            dir,
        }
    }

    /// JSON document path
    pub fn json(&self) -> &Path {
        &self.json
    }

    /// CSV path
    pub fn csv(&self) -> &Path {
        &self.csv
    }

    /// Create the output directory if needed
    pub fn ensure_directory(&self) -> OutputResult<()> {
        if self.dir.as_os_str().is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            OutputError::IoError(format!(
                "Failed to create directory {}: {e}",
                self.dir.display()
            ))
        })
    }
}

fn file_stem(window: &DateWindow) -> String {
    if window.is_full_month() {
        format!("{FILE_PREFIX}_{}_with_desc", window.start().format("%Y-%m"))
    } else {
        format!(
            "{FILE_PREFIX}_{}_to_{}_with_desc",
            window.start().format("%Y-%m-%d"),
            window.end().format("%Y-%m-%d")
        )
    }
}
