//! # Wembley Events Scraper
//!
//! Scrapes the Wembley Stadium events listing into a canonical JSON
//! document for the events API to serve.
//!
//! ## Features
//!
//! - Polite fetching: sliding-window rate limit, TTL page cache,
//!   browser-like request headers, bounded timeout
//! - Tolerant extraction: missing names and dates become sentinels, bad
//!   dates become absent ones, one broken block never aborts a run
//! - Atomic persistence: readers of the events file never see a
//!   half-written document
//!
//! ## Usage
//!
//! ```sh
//! wembley_events --output ./events_data.json
//! ```
//!
//! ## Architecture
//!
//! One invocation is one pass through the pipeline:
//! 1. **Fetch**: cached, rate-limited GET of the listing page
//! 2. **Extract**: pull event name and date text out of the HTML
//! 3. **Normalize**: parse date text into midnight-UTC timestamps
//! 4. **Store**: atomically replace the JSON events document
//!
//! Periodic operation is left to the scheduler running the binary.

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

use wembley_events::cli::ScrapeArgs;
use wembley_events::fetch::{FetchCache, Fetcher, RateLimiter};
use wembley_events::pipeline::ScrapePipeline;
use wembley_events::store::EventStore;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("wembley_events starting up");

    // Parse CLI
    let args = ScrapeArgs::parse();
    debug!(?args.url, ?args.output, "Parsed CLI arguments");

    // Early check: reject an unusable target URL before any network work.
    if let Err(e) = Url::parse(&args.url) {
        error!(url = %args.url, error = %e, "Target URL does not parse");
        return Err(e.into());
    }

    let limiter = RateLimiter::new(
        args.rate_limit_calls,
        Duration::from_secs(args.rate_limit_period_secs),
    );
    let cache = FetchCache::new(Duration::from_secs(args.cache_ttl_secs), args.cache_capacity);
    let fetcher = Fetcher::new(limiter, cache, Duration::from_secs(args.timeout_secs));
    let store = EventStore::new(args.output);
    let pipeline = ScrapePipeline::new(fetcher, args.url, store);

    let events = pipeline.run().await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        count = events.len(),
        "Execution complete"
    );

    Ok(())
}
