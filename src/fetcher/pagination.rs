//! Page-number pagination for listing searches
//!
//! The upstream gives no last-page signal: pages `1, 2, 3, ...` are
//! requested until one comes back empty or is rejected. There is no page cap.
//! Consecutive page requests are separated by the configured pacing delay.

use tracing::{debug, info, warn};

use crate::fetcher::jobs_api::{JobsApi, PageOutcome};
use crate::fetcher::{FetcherError, FetcherResult};
use crate::harvester::config::{Pacing, SearchParams};
use crate::shutdown::{sleep_unless_shutdown, SharedShutdown};
use crate::{ListingSummary, Termination};

/// Stateful driver over listing pages
pub struct ListingPaginator<'a> {
    api: &'a JobsApi,
    search: &'a SearchParams,
    pacing: &'a Pacing,
    shutdown: Option<SharedShutdown>,
    next_page: u32,
    pages_fetched: u32,
    termination: Option<Termination>,
}

impl<'a> ListingPaginator<'a> {
    /// Start at page 1
    pub fn new(api: &'a JobsApi, search: &'a SearchParams, pacing: &'a Pacing) -> Self {
        Self {
            api,
            search,
            pacing,
            shutdown: None,
            next_page: 1,
            pages_fetched: 0,
            termination: None,
        }
    }

    /// Let pacing sleeps be interrupted by a shutdown request
    pub fn with_shutdown(mut self, shutdown: Option<SharedShutdown>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Fetch the next page of listings.
    ///
    /// Returns `Ok(None)` once pagination has terminated; the reason is then
    /// available from [`ListingPaginator::termination`].
    pub async fn next_page(&mut self) -> FetcherResult<Option<Vec<ListingSummary>>> {
        if self.termination.is_some() {
            return Ok(None);
        }

        let page = self.next_page;
        if page > 1 {
            let delay = self.pacing.next_page_delay();
            debug!(page, delay_ms = delay.as_millis() as u64, "Pausing before next page");
            sleep_unless_shutdown(self.shutdown.as_ref(), delay)
                .await
                .map_err(|_| FetcherError::Interrupted)?;
        }

        let outcome = self.api.fetch_page(self.search, page).await?;
        self.next_page += 1;

        match outcome {
            PageOutcome::Rows(rows) => {
                self.pages_fetched += 1;
                debug!(page, rows = rows.len(), "Received listing page");
                Ok(Some(rows))
            }
            PageOutcome::EndOfResults => {
                info!(page, "Empty page received, pagination complete");
                self.termination = Some(Termination::EndOfResults);
                Ok(None)
            }
            PageOutcome::UpstreamRejected(status) => {
                warn!(
                    page,
                    status = status.as_u16(),
                    "Upstream rejected page request, stopping pagination"
                );
                self.termination = Some(Termination::UpstreamRejected {
                    status: status.as_u16(),
                });
                Ok(None)
            }
        }
    }

    /// Non-empty pages received so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Why pagination stopped, once it has
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }
}
