//! Event extraction from the stadium listing page.
//!
//! The events calendar renders one block per event. Extraction walks those
//! blocks in document order and pulls out a date text and a heading,
//! tolerating whatever is missing:
//!
//! - no date node → the [`UNKNOWN_DATE`] sentinel (which later fails date
//!   normalization, leaving the event undated)
//! - no heading → the [`UNKNOWN_EVENT`] sentinel
//! - no event blocks at all → an empty vector, never an error
//!
//! Only structure is interpreted here; dates stay raw text until
//! [`crate::normalize`] gets them.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::models::{EventDraft, UNKNOWN_DATE, UNKNOWN_EVENT};

/// One event block on the listing page.
static EVENT_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".fa-filter-content__item").expect("valid selector"));

/// The date text node nested inside an event block.
static EVENT_DATE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".col-xs-6.align-left.no-padding .small-text").expect("valid selector")
});

/// The heading carrying the event name.
static EVENT_HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2").expect("valid selector"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Extract event drafts from the listing page HTML, in document order.
///
/// Missing fields fall back to their sentinels; an input with no matching
/// blocks (including empty input) yields an empty vector.
pub fn extract_events(html: &str) -> Vec<EventDraft> {
    let document = Html::parse_document(html);

    let drafts: Vec<EventDraft> = document
        .select(&EVENT_BLOCK)
        .map(|block| EventDraft {
            name: select_text(block, &EVENT_HEADING)
                .unwrap_or_else(|| UNKNOWN_EVENT.to_string()),
            date_text: select_text(block, &EVENT_DATE)
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        })
        .collect();

    info!(count = drafts.len(), "Extracted event blocks");
    drafts
}

/// Collapsed text of the first node matching `selector` inside `scope`.
///
/// Text fragments are joined, trimmed, and inner whitespace runs collapsed
/// to single spaces so markup indentation never leaks into event names.
/// `None` only when no node matches; a present-but-empty node yields an
/// empty string.
fn select_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = scope.select(selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    Some(WHITESPACE.replace_all(text.trim(), " ").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_name_and_date_text() {
        let html = r#"
            <div class="fa-filter-content__item">
                <div class="col-xs-6 align-left no-padding">
                    <p class="small-text">15 Aug 2025</p>
                </div>
                <h2>Concert</h2>
            </div>
        "#;

        let drafts = extract_events(html);
        assert_eq!(
            drafts,
            vec![EventDraft {
                name: "Concert".to_string(),
                date_text: "15 Aug 2025".to_string(),
            }]
        );
    }

    #[test]
    fn test_no_event_blocks_yields_empty_vec() {
        assert!(extract_events("").is_empty());
        assert!(extract_events("<html><body><p>No events today.</p></body></html>").is_empty());
    }

    #[test]
    fn test_missing_date_node_falls_back_to_sentinel() {
        let html = r#"
            <div class="fa-filter-content__item">
                <h2>Mystery Fixture</h2>
            </div>
        "#;

        let drafts = extract_events(html);
        assert_eq!(drafts[0].name, "Mystery Fixture");
        assert_eq!(drafts[0].date_text, UNKNOWN_DATE);
    }

    #[test]
    fn test_missing_heading_falls_back_to_sentinel() {
        let html = r#"
            <div class="fa-filter-content__item">
                <div class="col-xs-6 align-left no-padding">
                    <span class="small-text">01 Jan 2026</span>
                </div>
            </div>
        "#;

        let drafts = extract_events(html);
        assert_eq!(drafts[0].name, UNKNOWN_EVENT);
        assert_eq!(drafts[0].date_text, "01 Jan 2026");
    }

    #[test]
    fn test_blocks_come_out_in_document_order() {
        let html = r#"
            <div class="fa-filter-content__item"><h2>First</h2></div>
            <div class="fa-filter-content__item"><h2>Second</h2></div>
            <div class="fa-filter-content__item"><h2>Third</h2></div>
        "#;

        let names: Vec<String> = extract_events(html).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_markup_whitespace_is_collapsed() {
        let html = r#"
            <div class="fa-filter-content__item">
                <h2>
                    Taylor
                    <em>Swift</em>
                </h2>
            </div>
        "#;

        let drafts = extract_events(html);
        assert_eq!(drafts[0].name, "Taylor Swift");
    }

    #[test]
    fn test_only_first_date_node_is_used() {
        let html = r#"
            <div class="fa-filter-content__item">
                <div class="col-xs-6 align-left no-padding">
                    <span class="small-text">15 Aug 2025</span>
                    <span class="small-text">16 Aug 2025</span>
                </div>
                <h2>Two-Night Run</h2>
            </div>
        "#;

        let drafts = extract_events(html);
        assert_eq!(drafts[0].date_text, "15 Aug 2025");
    }
}
