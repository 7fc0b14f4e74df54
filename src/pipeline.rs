//! End-to-end scrape orchestration.
//!
//! One [`ScrapePipeline::run`] call is one complete pass: fetch the listing
//! page, extract event blocks, normalize their dates, persist the result.
//! The pipeline takes its page source as a [`FetchPage`] implementation so
//! tests can drive it with canned HTML instead of a live site.

use tracing::{error, info, instrument};

use crate::error::StoreError;
use crate::extract::extract_events;
use crate::fetch::FetchPage;
use crate::models::{Event, EventDraft};
use crate::normalize::normalize_date;
use crate::store::EventStore;

/// Orchestrates one scrape pass over a fetcher, a target URL and a store.
pub struct ScrapePipeline<F> {
    fetcher: F,
    url: String,
    store: EventStore,
}

impl<F: FetchPage> ScrapePipeline<F> {
    pub fn new(fetcher: F, url: impl Into<String>, store: EventStore) -> Self {
        Self {
            fetcher,
            url: url.into(),
            store,
        }
    }

    /// Run one scrape pass.
    ///
    /// A failed fetch is not a pipeline error: it logs, leaves the stored
    /// document untouched so previously scraped data stays live, and
    /// returns an empty list. A successful fetch always writes, even when
    /// zero events were found, so a genuinely emptied listing replaces
    /// stale data. Only a store write failure propagates.
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    pub async fn run(&self) -> Result<Vec<Event>, StoreError> {
        let html = match self.fetcher.fetch(&self.url).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "Fetch failed; keeping previously stored events");
                return Ok(Vec::new());
            }
        };

        let events = assemble(extract_events(&html));
        self.store.save(&events).await?;

        let dated = events.iter().filter(|e| e.is_dated()).count();
        info!(count = events.len(), dated, "Scrape run complete");
        Ok(events)
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }
}

/// Pair each draft with its normalized date. Names pass through untouched
/// whether or not the date text parses.
fn assemble(drafts: Vec<EventDraft>) -> Vec<Event> {
    drafts
        .into_iter()
        .map(|draft| {
            let date = normalize_date(&draft.date_text, &draft.name);
            Event {
                name: draft.name,
                date,
            }
        })
        .collect()
}
