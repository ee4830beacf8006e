//! Harvest command: configuration from flags/environment, run, write, summary

use crate::harvester::config::{validate_api_key, DEFAULT_ENDPOINT};
use crate::harvester::{HarvestConfig, HarvestReport, Harvester, Pacing, RetryPolicy, SearchParams};
use crate::output::{self, OutputPaths};
use crate::shutdown::SharedShutdown;
use crate::window::DateWindow;
use chrono::NaiveDate;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::CliError;

/// Sort orders accepted by the upstream
const SORT_ORDERS: [&str; 4] = ["", "day", "week", "month"];

/// Longest pacing delay accepted, in seconds
const MAX_DELAY_SECS: f64 = 3_600.0;

/// Parse a non-negative delay in (fractional) seconds
fn parse_delay(s: &str) -> Result<Duration, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("delay must be a non-negative number of seconds, got {s}"));
    }
    if value > MAX_DELAY_SECS {
        return Err(format!("delay must be at most {MAX_DELAY_SECS} seconds, got {s}"));
    }
    Duration::try_from_secs_f64(value).map_err(|e| format!("invalid delay '{s}': {e}"))
}

fn parse_sort_by(s: &str) -> Result<String, String> {
    let value = s.trim().to_lowercase();
    if SORT_ORDERS.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(format!("invalid sort order '{s}'. Valid options: day, week, month"))
    }
}

fn parse_date(input: &str, what: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| CliError::ConfigurationError(format!("invalid {what} '{input}': {e}")))
}

/// Output format options for the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

/// Listing harvester CLI
///
/// Every option can also be supplied through the environment variable shown
/// in `--help`.
#[derive(Parser, Debug)]
#[command(name = "listing-harvester")]
#[command(about = "Harvest one month of job listings with full descriptions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// API key for the job-search service (at least 10 characters)
    #[arg(long, env = "SCRAPINGDOG_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Job-search endpoint URL
    #[arg(long, env = "HARVEST_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Free-text search field
    #[arg(long, env = "FIELD", default_value = "data engineer")]
    pub field: String,

    /// Geographic id (default: Netherlands)
    #[arg(long, env = "GEOID", default_value = "102890719")]
    pub geoid: String,

    /// Location string, e.g. "Amsterdam"
    #[arg(long, env = "LOCATION", default_value = "")]
    pub location: String,

    /// Sort order: day, week or month
    #[arg(long, env = "SORT_BY", default_value = "", value_parser = parse_sort_by)]
    pub sort_by: String,

    /// Job type: temporary, contract, volunteer, full_time, part_time
    #[arg(long, env = "JOB_TYPE", default_value = "")]
    pub job_type: String,

    /// Experience level: internship, entry_level, associate, mid_senior_level, director
    #[arg(long, env = "EXP_LEVEL", default_value = "")]
    pub exp_level: String,

    /// Work arrangement: at_work, remote, hybrid
    #[arg(long, env = "WORK_TYPE", default_value = "")]
    pub work_type: String,

    /// Company filter id
    #[arg(long, env = "FILTER_BY_COMPANY", default_value = "")]
    pub filter_by_company: String,

    /// Seconds to wait between listing pages (plus jitter)
    #[arg(long, env = "BASE_DELAY", default_value = "1.0", value_parser = parse_delay)]
    pub base_delay: Duration,

    /// Seconds to wait after each overview call (plus jitter)
    #[arg(long, env = "OV_DELAY", default_value = "0.6", value_parser = parse_delay)]
    pub ov_delay: Duration,

    /// Calendar month to keep, as YYYY-MM
    #[arg(long, env = "WINDOW_MONTH", default_value = "2025-07")]
    pub window_month: String,

    /// First day to keep (YYYY-MM-DD), overrides --window-month
    #[arg(long, env = "WINDOW_START", requires = "window_end")]
    pub window_start: Option<String>,

    /// Last day to keep (YYYY-MM-DD), overrides --window-month
    #[arg(long, env = "WINDOW_END", requires = "window_start")]
    pub window_end: Option<String>,

    /// Give up on a request after this many attempts (default: retry forever)
    #[arg(long, env = "MAX_ATTEMPTS", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Directory for the JSON and CSV files
    #[arg(long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Summary format (json or human)
    #[arg(long, default_value = "human")]
    pub output_format: OutputFormat,
}

/// What a successful run reports at the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Listings seen
    pub total_seen: u64,
    /// Listings inside the window
    pub matched: u64,
    /// Non-empty overviews fetched
    pub overviews_fetched: u64,
    /// JSON document path
    pub json_path: PathBuf,
    /// CSV path
    pub csv_path: PathBuf,
}

impl HarvestSummary {
    fn new(report: &HarvestReport, paths: &OutputPaths) -> Self {
        Self {
            total_seen: report.metadata.records_total_seen,
            matched: report.metadata.records_in_window,
            overviews_fetched: report.metadata.overviews_fetched,
            json_path: paths.json().to_path_buf(),
            csv_path: paths.csv().to_path_buf(),
        }
    }

    /// Print in the requested format
    pub fn print(&self, format: OutputFormat) {
        match format {
            OutputFormat::Human => {
                println!("Seen total listings: {}", self.total_seen);
                println!(
                    "Window matches: {} (overviews fetched: {})",
                    self.matched, self.overviews_fetched
                );
                println!("Saved JSON => {}", self.json_path.display());
                println!("Saved CSV  => {}", self.csv_path.display());
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "records_total_seen": self.total_seen,
                    "records_in_window": self.matched,
                    "overviews_fetched": self.overviews_fetched,
                    "json_path": self.json_path.display().to_string(),
                    "csv_path": self.csv_path.display().to_string(),
                });
                println!("{output}");
            }
        }
    }
}

impl Cli {
    /// Resolve the posting-date window
    pub fn window(&self) -> Result<DateWindow, CliError> {
        match (&self.window_start, &self.window_end) {
            (Some(start), Some(end)) => Ok(DateWindow::new(
                parse_date(start, "window start")?,
                parse_date(end, "window end")?,
            )?),
            _ => Ok(DateWindow::parse_month(&self.window_month)?),
        }
    }

    /// Build the immutable run configuration.
    ///
    /// # Errors
    /// [`CliError::ConfigurationError`] when the API key is missing or too
    /// short, or the window is invalid.
    pub fn harvest_config(&self) -> Result<HarvestConfig, CliError> {
        let api_key = self.api_key.clone().unwrap_or_default();
        validate_api_key(&api_key).map_err(CliError::ConfigurationError)?;

        let search = SearchParams {
            field: self.field.clone(),
            geoid: self.geoid.clone(),
            location: self.location.clone(),
            sort_by: self.sort_by.clone(),
            job_type: self.job_type.clone(),
            exp_level: self.exp_level.clone(),
            work_type: self.work_type.clone(),
            filter_by_company: self.filter_by_company.clone(),
        };

        let config = HarvestConfig::new(api_key.trim(), search, self.window()?)
            .with_endpoint(self.endpoint.clone())
            .with_retry_policy(RetryPolicy::default().with_max_attempts(self.max_attempts))
            .with_pacing(Pacing::with_delays(self.base_delay, self.ov_delay));
        Ok(config)
    }

    /// Run the harvest, write both files and print the summary
    pub async fn execute(&self, shutdown: SharedShutdown) -> Result<HarvestSummary, CliError> {
        let config = self.harvest_config()?;
        let paths = OutputPaths::for_window(&self.output_dir, &config.window);

        info!(
            window = %config.window,
            json = %paths.json().display(),
            csv = %paths.csv().display(),
            "Configuration loaded"
        );

        let harvester = Harvester::new(config)?.with_shutdown(shutdown);
        let progress = create_spinner();
        let result = harvester.run_with_progress(Some(&progress)).await;
        progress.finish_and_clear();
        let report = result?;

        output::write_report(&report, &paths)?;

        let summary = HarvestSummary::new(&report, &paths);
        summary.print(self.output_format);
        Ok(summary)
    }
}

fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message("fetching page 1");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
