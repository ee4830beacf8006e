//! Harvest executor: pagination, window filter, enrichment and aggregation

use chrono::Utc;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extract::extract_description;
use crate::fetcher::http::RetryingHttpClient;
use crate::fetcher::jobs_api::JobsApi;
use crate::fetcher::pagination::ListingPaginator;
use crate::harvester::config::{validate_api_key, HarvestConfig};
use crate::harvester::{HarvestError, HarvestResult};
use crate::shutdown::{self, sleep_unless_shutdown, SharedShutdown};
use crate::{EnrichedRecord, RunMetadata, Termination};

/// Everything one run produced, in the shape of the JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestReport {
    /// Counters and parameters
    #[serde(rename = "meta")]
    pub metadata: RunMetadata,
    /// Matching records in encounter order
    #[serde(rename = "data")]
    pub records: Vec<EnrichedRecord>,
}

#[derive(Debug, Default)]
struct RunCounters {
    seen: u64,
    matched: u64,
    overviews: u64,
}

/// Drives one harvest run
pub struct Harvester {
    config: HarvestConfig,
    api: JobsApi,
    shutdown: Option<SharedShutdown>,
}

impl Harvester {
    /// Validate the configuration and build the HTTP stack.
    ///
    /// # Errors
    /// [`HarvestError::Configuration`] for a missing or implausible API key.
    pub fn new(config: HarvestConfig) -> HarvestResult<Self> {
        validate_api_key(&config.api_key).map_err(HarvestError::Configuration)?;

        let shutdown = shutdown::get_global_shutdown();
        let http = RetryingHttpClient::new(
            config.endpoint.clone(),
            config.retry.clone(),
            config.request_timeout,
        )?
        .with_shutdown(shutdown.clone());
        let api = JobsApi::new(http, config.api_key.clone());

        Ok(Self {
            config,
            api,
            shutdown,
        })
    }

    /// Use a specific shutdown coordinator instead of the global one
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.api = self.api.with_shutdown(Some(shutdown.clone()));
        self.shutdown = Some(shutdown);
        self
    }

    /// Configuration of this run
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Run to completion without progress reporting
    pub async fn run(&self) -> HarvestResult<HarvestReport> {
        self.run_with_progress(None).await
    }

    /// Run to completion, updating `progress` with running counts
    pub async fn run_with_progress(
        &self,
        progress: Option<&ProgressBar>,
    ) -> HarvestResult<HarvestReport> {
        let window = self.config.window;
        let pacing = &self.config.pacing;
        let mut paginator = ListingPaginator::new(&self.api, &self.config.search, pacing)
            .with_shutdown(self.shutdown.clone());

        let mut counters = RunCounters::default();
        let mut records = Vec::new();

        info!(
            field = %self.config.search.field,
            geoid = %self.config.search.geoid,
            window = %window,
            "Starting harvest"
        );

        while let Some(listings) = paginator.next_page().await? {
            for listing in listings {
                counters.seen += 1;

                if !window.contains_raw(listing.job_posting_date.as_deref()) {
                    continue;
                }

                let overview = self.api.fetch_overview(&listing.job_id).await?;
                if !overview.is_empty() {
                    counters.overviews += 1;
                }
                let description = extract_description(&overview);
                debug!(
                    job_id = %listing.job_id,
                    description_chars = description.chars().count(),
                    "Enriched listing"
                );

                records.push(EnrichedRecord::new(listing, description));
                counters.matched += 1;

                sleep_unless_shutdown(self.shutdown.as_ref(), pacing.next_overview_delay())
                    .await
                    .map_err(|_| HarvestError::Interrupted)?;
            }

            if let Some(pb) = progress {
                pb.set_message(format!(
                    "page {} | seen {} | matched {}",
                    paginator.pages_fetched(),
                    counters.seen,
                    counters.matched
                ));
                pb.tick();
            }
        }

        let termination = paginator.termination().unwrap_or(Termination::EndOfResults);
        info!(
            pages = paginator.pages_fetched(),
            seen = counters.seen,
            matched = counters.matched,
            overviews = counters.overviews,
            termination = termination.label(),
            "Harvest complete"
        );

        let search = &self.config.search;
        let metadata = RunMetadata {
            retrieved_at: Utc::now(),
            geoid: search.geoid.clone(),
            field: search.field.clone(),
            location: non_empty(&search.location),
            sort_by: non_empty(&search.sort_by),
            job_type: non_empty(&search.job_type),
            exp_level: non_empty(&search.exp_level),
            work_type: non_empty(&search.work_type),
            filter_by_company: non_empty(&search.filter_by_company),
            records_total_seen: counters.seen,
            records_in_window: counters.matched,
            overviews_fetched: counters.overviews,
            pages_fetched: paginator.pages_fetched(),
            termination,
            window_start: window.start(),
            window_end: window.end(),
        };

        Ok(HarvestReport { metadata, records })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
