//! Harvest configuration: constants, retry policy, pacing and search parameters

use crate::window::DateWindow;
use rand::Rng;
use std::time::Duration;

/// Default job-search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.scrapingdog.com/linkedinjobs";

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status codes treated as transient and retried
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// First backoff step in milliseconds (attempt 1)
pub const INITIAL_BACKOFF_MS: u64 = 1_000;

/// Backoff ceiling in milliseconds
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Shortest API key accepted as plausible
pub const MIN_API_KEY_LEN: usize = 10;

/// Default delay between listing pages
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1_000);

/// Default delay after each overview call
pub const DEFAULT_OVERVIEW_DELAY: Duration = Duration::from_millis(600);

/// Exponential backoff for a 1-based attempt number, capped at `max`
pub fn calculate_backoff(attempt: u32, initial: Duration, max: Duration) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    initial
        .checked_mul(2u32.pow(exponent))
        .unwrap_or(max)
        .min(max)
}

/// Uniform random delay in `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    min: Duration,
    max: Duration,
}

impl Jitter {
    /// Jitter between two bounds given in milliseconds
    pub const fn from_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }

    /// No jitter at all
    pub const fn none() -> Self {
        Self::from_millis(0, 0)
    }

    /// Draw one delay. Degenerate ranges yield `min`.
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Lower bound
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound (exclusive)
    pub fn max(&self) -> Duration {
        self.max
    }
}

/// Retry jitter added to computed backoff
pub const RETRY_JITTER: Jitter = Jitter::from_millis(200, 900);

/// Jitter added to the inter-page delay
pub const PAGE_JITTER: Jitter = Jitter::from_millis(200, 800);

/// Jitter added to the post-overview delay
pub const OVERVIEW_JITTER: Jitter = Jitter::from_millis(100, 500);

/// How transient failures are retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Backoff for the first retry
    pub initial_backoff: Duration,
    /// Backoff ceiling
    pub max_backoff: Duration,
    /// Random delay added to computed backoff (not to Retry-After)
    pub jitter: Jitter,
    /// Total attempts allowed per request; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
            jitter: RETRY_JITTER,
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Cap the number of attempts per request
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Delay before retrying after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.initial_backoff, self.max_backoff) + self.jitter.sample()
    }

    /// Whether another attempt is allowed after `attempt` failed
    pub fn allows_retry(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt < max)
    }
}

/// Sleeps used to stay under upstream rate limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// Fixed delay before each page after the first
    pub page_delay: Duration,
    /// Random addition to `page_delay`
    pub page_jitter: Jitter,
    /// Fixed delay after each overview call
    pub overview_delay: Duration,
    /// Random addition to `overview_delay`
    pub overview_jitter: Jitter,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            page_delay: DEFAULT_PAGE_DELAY,
            page_jitter: PAGE_JITTER,
            overview_delay: DEFAULT_OVERVIEW_DELAY,
            overview_jitter: OVERVIEW_JITTER,
        }
    }
}

impl Pacing {
    /// No delays at all
    pub fn none() -> Self {
        Self {
            page_delay: Duration::ZERO,
            page_jitter: Jitter::none(),
            overview_delay: Duration::ZERO,
            overview_jitter: Jitter::none(),
        }
    }

    /// Override the fixed delays, keeping the default jitter
    pub fn with_delays(page_delay: Duration, overview_delay: Duration) -> Self {
        Self {
            page_delay,
            overview_delay,
            ..Self::default()
        }
    }

    /// Delay to wait before the next page
    pub fn next_page_delay(&self) -> Duration {
        self.page_delay + self.page_jitter.sample()
    }

    /// Delay to wait after an overview call
    pub fn next_overview_delay(&self) -> Duration {
        self.overview_delay + self.overview_jitter.sample()
    }
}

/// Search parameters forwarded to the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text search field
    pub field: String,
    /// Geographic id
    pub geoid: String,
    /// Location string, always sent (possibly empty)
    pub location: String,
    /// Sort order: "", "day", "week" or "month"
    pub sort_by: String,
    /// Job type filter
    pub job_type: String,
    /// Experience level filter
    pub exp_level: String,
    /// Work arrangement filter
    pub work_type: String,
    /// Company filter id
    pub filter_by_company: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            field: "data engineer".to_string(),
            // Netherlands
            geoid: "102890719".to_string(),
            location: String::new(),
            sort_by: String::new(),
            job_type: String::new(),
            exp_level: String::new(),
            work_type: String::new(),
            filter_by_company: String::new(),
        }
    }
}

impl SearchParams {
    /// Query parameters for one listing page, without the API key.
    ///
    /// Optional filters are sent only when non-empty.
    pub fn page_query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("field", self.field.clone()),
            ("geoid", self.geoid.clone()),
            ("location", self.location.clone()),
            ("page", page.to_string()),
        ];
        let optional = [
            ("sort_by", &self.sort_by),
            ("job_type", &self.job_type),
            ("exp_level", &self.exp_level),
            ("work_type", &self.work_type),
            ("filter_by_company", &self.filter_by_company),
        ];
        params.extend(
            optional
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key, value.clone())),
        );
        params
    }
}

/// Validate the API key before any network call
pub fn validate_api_key(api_key: &str) -> Result<(), String> {
    if api_key.trim().is_empty() {
        return Err("missing API key (set SCRAPINGDOG_API_KEY)".to_string());
    }
    if api_key.trim().len() < MIN_API_KEY_LEN {
        return Err(format!(
            "API key looks implausibly short ({} chars, expected at least {MIN_API_KEY_LEN})",
            api_key.trim().len()
        ));
    }
    Ok(())
}

/// Immutable configuration for one harvest run
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Upstream API key
    pub api_key: String,
    /// Endpoint URL serving both listing pages and overviews
    pub endpoint: String,
    /// Listing search parameters
    pub search: SearchParams,
    /// Posting-date window
    pub window: DateWindow,
    /// Retry behaviour for every request
    pub retry: RetryPolicy,
    /// Rate-limit sleeps
    pub pacing: Pacing,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl HarvestConfig {
    /// Configuration with default endpoint, retry policy and pacing
    pub fn new(api_key: impl Into<String>, search: SearchParams, window: DateWindow) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            search,
            window,
            retry: RetryPolicy::default(),
            pacing: Pacing::default(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Use a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a different retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use different pacing
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }
}
