//! Events API server binary.
//!
//! Serves the JSON document produced by the scraper binary. Strictly
//! read-only: nothing here ever writes the events file.
//!
//! ```sh
//! serve --bind 127.0.0.1:5000 --events-file ./events_data.json
//! ```

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use wembley_events::cli::ServeArgs;
use wembley_events::serve::{build_router, AppState};
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

    let args = ServeArgs::parse();
    debug!(?args.events_file, ?args.bind, "Parsed CLI arguments");

    let addr: SocketAddr = args.bind.parse()?;
    let state = Arc::new(AppState {
        store: EventStore::new(args.events_file),
    });
    let router = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Events API listening");

    axum::serve(listener, router).await?;
    Ok(())
}
