//! # Listing Harvester Library
//!
//! Pulls one calendar window of job listings from a paginated job-search API,
//! enriches each matching listing with its full description and writes the
//! result as JSON and CSV.
//!
//! ## Pipeline
//!
//! 1. [`fetcher::pagination::ListingPaginator`] requests pages `1, 2, ...` until
//!    the upstream returns an empty page or rejects a request
//! 2. [`window::DateWindow`] keeps listings posted inside the window
//! 3. [`fetcher::jobs_api::JobsApi::fetch_overview`] loads the detail payload,
//!    and [`extract::extract_description`] pulls the description out of it
//! 4. [`harvester::Harvester`] collects [`EnrichedRecord`]s in encounter order
//! 5. [`output`] writes both files once, after the last page
//!
//! Every request goes through [`fetcher::http::RetryingHttpClient`], which
//! retries rate limits and 5xx answers with capped exponential backoff.
//!
//! ## Quick Start
//!
//! ```no_run
//! use listing_harvester::harvester::{HarvestConfig, Harvester, SearchParams};
//! use listing_harvester::window::DateWindow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarvestConfig::new(
//!     "my-api-key-123",
//!     SearchParams::default(),
//!     DateWindow::month(2025, 7)?,
//! );
//! let report = Harvester::new(config)?.run().await?;
//! println!("{} of {} listings matched", report.metadata.records_in_window, report.metadata.records_total_seen);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CLI command implementations
pub mod cli;

/// Description extraction from overview payloads
pub mod extract;

/// HTTP access to the job-search API
pub mod fetcher;

/// Run orchestration and configuration
pub mod harvester;

/// JSON and CSV writers
pub mod output;

/// Graceful shutdown coordination
pub mod shutdown;

/// Posting-date window filter
pub mod window;

pub use extract::{extract_description, OverviewPayload};
pub use window::DateWindow;

/// One entry of a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSummary {
    /// Upstream job identifier, empty when the listing has none
    pub job_id: String,
    /// Job title
    pub job_position: Option<String>,
    /// Hiring company
    pub company_name: Option<String>,
    /// Link to the company profile
    pub company_profile: Option<String>,
    /// Free-text location
    pub job_location: Option<String>,
    /// Link to the posting
    pub job_link: Option<String>,
    /// Free-form posting date as sent by the upstream
    pub job_posting_date: Option<String>,
}

impl ListingSummary {
    /// Build a listing from one element of a listing page.
    ///
    /// Returns `None` when the element is not a JSON object. String fields are
    /// taken verbatim, numbers are rendered as text, anything else is absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            job_id: text_field(object, "job_id").unwrap_or_default(),
            job_position: text_field(object, "job_position"),
            company_name: text_field(object, "company_name"),
            company_profile: text_field(object, "company_profile"),
            job_location: text_field(object, "job_location"),
            job_link: text_field(object, "job_link"),
            job_posting_date: text_field(object, "job_posting_date"),
        })
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A listing that matched the window, with its description attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// Upstream job identifier
    pub job_id: String,
    /// Job title
    pub job_position: Option<String>,
    /// Hiring company
    pub company_name: Option<String>,
    /// Link to the company profile
    pub company_profile: Option<String>,
    /// Free-text location
    pub job_location: Option<String>,
    /// Link to the posting
    pub job_link: Option<String>,
    /// Posting date as sent by the upstream
    pub job_posting_date: Option<String>,
    /// Extracted description, empty when none was found
    pub description: String,
}

impl EnrichedRecord {
    /// Attach a description to a listing
    pub fn new(listing: ListingSummary, description: String) -> Self {
        Self {
            job_id: listing.job_id,
            job_position: listing.job_position,
            company_name: listing.company_name,
            company_profile: listing.company_profile,
            job_location: listing.job_location,
            job_link: listing.job_link,
            job_posting_date: listing.job_posting_date,
            description,
        }
    }
}

/// How pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A page came back empty
    EndOfResults,
    /// The upstream answered a page request with a non-retryable status
    UpstreamRejected {
        /// HTTP status code of the rejection
        status: u16,
    },
}

impl Termination {
    /// Short label used in logs and metadata
    pub fn label(&self) -> &'static str {
        match self {
            Termination::EndOfResults => "end_of_results",
            Termination::UpstreamRejected { .. } => "upstream_rejected",
        }
    }
}

/// Run-level counters and parameters written next to the records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// When the run finished collecting
    pub retrieved_at: DateTime<Utc>,
    /// Geographic id searched
    pub geoid: String,
    /// Free-text search field
    pub field: String,
    /// Location filter
    pub location: Option<String>,
    /// Sort order
    pub sort_by: Option<String>,
    /// Job type filter
    pub job_type: Option<String>,
    /// Experience level filter
    pub exp_level: Option<String>,
    /// Work arrangement filter
    pub work_type: Option<String>,
    /// Company filter id
    pub filter_by_company: Option<String>,
    /// Listings seen across all pages
    pub records_total_seen: u64,
    /// Listings inside the window
    #[serde(rename = "records_in_july")]
    pub records_in_window: u64,
    /// Overview calls that returned a non-empty payload
    pub overviews_fetched: u64,
    /// Non-empty listing pages processed
    pub pages_fetched: u32,
    /// Why pagination stopped
    pub termination: Termination,
    /// First day of the window
    pub window_start: NaiveDate,
    /// Last day of the window
    pub window_end: NaiveDate,
}
