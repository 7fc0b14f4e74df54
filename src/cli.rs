//! Command-line interfaces for the scraper and the API server.
//!
//! Both binaries configure themselves through `clap`. Every option that a
//! deployment is likely to set has an environment-variable fallback, so
//! cron lines and service units can stay flag-free.

use clap::Parser;

/// Command-line arguments for the scraper binary.
///
/// One invocation performs one scrape pass and exits; periodic operation
/// is the scheduler's job (cron, systemd timer).
///
/// # Examples
///
/// ```sh
/// # Scrape the default listing into ./events_data.json
/// wembley_events
///
/// # Scrape a mirror into a custom location
/// wembley_events --url https://staging.example.net/events \
///     --output /var/lib/wembley/events_data.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct ScrapeArgs {
    /// Events listing page to scrape
    #[arg(
        long,
        env = "SCRAPE_URL",
        default_value = "https://www.wembleystadium.com/events"
    )]
    pub url: String,

    /// Path of the JSON events file to write
    #[arg(short, long, env = "EVENTS_FILE", default_value = "events_data.json")]
    pub output: String,

    /// Seconds a cached page stays fresh
    #[arg(long, default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Maximum number of pages held in the fetch cache
    #[arg(long, default_value_t = 100)]
    pub cache_capacity: usize,

    /// Requests admitted per rate-limit period
    #[arg(long, default_value_t = 5)]
    pub rate_limit_calls: usize,

    /// Length of the rate-limit period in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_limit_period_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

/// Command-line arguments for the events API server.
///
/// # Examples
///
/// ```sh
/// serve --bind 0.0.0.0:5000 --events-file /var/lib/wembley/events_data.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct ServeArgs {
    /// Path of the JSON events file to serve
    #[arg(short, long, env = "EVENTS_FILE", default_value = "events_data.json")]
    pub events_file: String,

    /// Address to listen on
    #[arg(short, long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    pub bind: String,
}
