//! Inclusive calendar-date window and permissive posting-date parsing
//!
//! Upstream listings carry a free-form `job_posting_date`. [`parse_posting_date`]
//! accepts the common machine and human date layouts and reduces them to the
//! calendar date as written; [`DateWindow::contains_raw`] then decides
//! membership. Anything that does not parse is simply outside the window.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Errors building a [`DateWindow`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WindowError {
    /// Start date is after end date
    #[error("window start {start} is after window end {end}")]
    Inverted {
        /// Requested start
        start: NaiveDate,
        /// Requested end
        end: NaiveDate,
    },

    /// Year/month pair does not name a real month
    #[error("invalid month: {0}")]
    InvalidMonth(String),
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window from two inclusive bounds
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window covering one whole calendar month
    pub fn month(year: i32, month: u32) -> Result<Self, WindowError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| WindowError::InvalidMonth(format!("{year:04}-{month:02}")))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| WindowError::InvalidMonth(format!("{year:04}-{month:02}")))?;
        Ok(Self { start, end })
    }

    /// Parse a `YYYY-MM` month specifier
    pub fn parse_month(input: &str) -> Result<Self, WindowError> {
        let input = input.trim();
        let (year, month) = input
            .split_once('-')
            .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)))
            .ok_or_else(|| WindowError::InvalidMonth(input.to_string()))?;
        Self::month(year, month)
    }

    /// First day of the window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether this window spans exactly one whole calendar month
    pub fn is_full_month(&self) -> bool {
        Self::month(self.start.year(), self.start.month()).is_ok_and(|m| m == *self)
    }

    /// Whether the given date falls inside the window (both ends inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Parse a raw upstream date string and test membership.
    ///
    /// Missing or unparseable input is never in the window.
    pub fn contains_raw(&self, raw: Option<&str>) -> bool {
        raw.and_then(parse_posting_date)
            .is_some_and(|date| self.contains(date))
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%b %d %Y %I:%M%p",
    "%b %d, %Y %I:%M %p",
    "%B %d, %Y %I:%M %p",
    "%d %B %Y %H:%M",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    // Day-first only where month-first cannot match ("15/07/2025")
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
];

/// Parse a free-form posting date into its calendar date.
///
/// Timezone offsets and time of day are discarded; the date is taken as
/// written in the input.
pub fn parse_posting_date(raw: &str) -> Option<NaiveDate> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.date_naive());
    }
    // Offsets without the RFC 3339 colon, e.g. "2025-07-15T10:00:00+0200"
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.date_naive());
    }

    // Trailing "Z" / "UTC" do not change the written date
    let stripped = input
        .strip_suffix('Z')
        .or_else(|| input.strip_suffix(" UTC"))
        .unwrap_or(input)
        .trim_end();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(stripped, format) {
            return Some(dt.date());
        }
    }

    // Drop ordinal suffixes ("July 1st, 2025") for the human layouts
    let normalized = strip_ordinals(stripped);
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, format) {
            return Some(date);
        }
    }

    None
}

fn strip_ordinals(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let (body, comma) = match word.strip_suffix(',') {
                Some(body) => (body, ","),
                None => (word, ""),
            };
            let trimmed = ["st", "nd", "rd", "th"]
                .iter()
                .find_map(|suffix| {
                    body.strip_suffix(suffix)
                        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
                })
                .unwrap_or(body);
            format!("{trimmed}{comma}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}
