//! Polite HTTP retrieval of the events listing page.
//!
//! [`Fetcher`] owns the three collaborators that make scraping the stadium
//! site tolerable to the target server, composed in a fixed order:
//!
//! 1. [`FetchCache`]: a hit returns immediately, skipping everything below
//! 2. [`RateLimiter`]: admits the network attempt
//! 3. `reqwest`: the actual request, with browser-like headers and a
//!    bounded timeout
//!
//! On any transport or status failure the fetcher logs, sleeps a fixed
//! cooldown, and returns the error. There is no retry loop here: whether to
//! try again is the next scheduled run's decision.

pub mod cache;
pub mod rate_limit;

pub use cache::FetchCache;
pub use rate_limit::RateLimiter;

use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, PRAGMA, USER_AGENT,
};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;

/// Fixed pause after a failed attempt before the error is handed back.
/// Keeps a misbehaving run from hammering a struggling server even when an
/// external scheduler retries aggressively.
const COOLDOWN_AFTER_FAILURE: Duration = Duration::from_secs(5);

/// Something that can retrieve a page body for a URL.
///
/// [`Fetcher`] is the production implementation; the pipeline is generic
/// over this trait so tests (and alternative sources) can stand in for the
/// network.
pub trait FetchPage {
    /// Retrieve the body at `url` as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Rate-limited, cached, timeout-bounded page fetcher.
pub struct Fetcher {
    client: reqwest::Client,
    limiter: RateLimiter,
    cache: FetchCache,
    timeout: Duration,
}

impl Fetcher {
    /// Build a fetcher owning its limiter and cache.
    ///
    /// The HTTP client is constructed once with the request timeout and the
    /// browser-identifying default header set applied to every request.
    pub fn new(limiter: RateLimiter, cache: FetchCache, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers())
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            limiter,
            cache,
            timeout,
        }
    }

    /// One rate-limited network attempt, cooldown applied on failure.
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_uncached(&self, url: &str) -> Result<String, FetchError> {
        self.limiter.acquire().await;

        match self.request(url).await {
            Ok(body) => Ok(body),
            Err(e) => {
                warn!(%url, error = %e, "fetch failed; cooling down before reporting");
                sleep(COOLDOWN_AFTER_FAILURE).await;
                Err(e)
            }
        }
    }

    async fn request(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Unavailable(format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!(%url, bytes = body.len(), "fetched listing page");
        Ok(body)
    }

    /// Map a transport error onto the fetch taxonomy.
    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Unavailable(e.to_string())
        }
    }
}

impl FetchPage for Fetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // Cache hits return here without touching the rate limiter.
        self.cache
            .get_or_fetch(url, || self.fetch_uncached(url))
            .await
    }
}

/// Header set identifying the scraper as an ordinary desktop browser.
///
/// The listing page rejects obvious non-browser clients; these values match
/// what a current desktop Chrome sends for a top-level navigation.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.9"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
}
