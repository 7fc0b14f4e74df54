//! Date normalization for extracted events.
//!
//! The listing page prints dates as day, three-letter month abbreviation,
//! four-digit year (`15 Aug 2025`). Anything else, including the
//! `"Unknown Date"` sentinel from extraction, normalizes to an absent
//! date with a warning, never an error: one bad date must not take the
//! rest of the batch down with it.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Accepted input shape, matching how the stadium site prints dates.
const DATE_FORMAT: &str = "%d %b %Y";

/// Exact-shape guard: `chrono` alone would also accept full month names,
/// which the page never produces and the contract rejects.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2} [A-Za-z]{3} \d{4}$").expect("valid regex"));

/// Normalize a raw date text to midnight UTC on that date.
///
/// Returns `None` for any input not matching `D MMM YYYY` (after trimming)
/// and logs a warning naming the offending event so the bad source row can
/// be found. The caller keeps the event, just without a date.
pub fn normalize_date(date_text: &str, event_name: &str) -> Option<DateTime<Utc>> {
    let trimmed = date_text.trim();

    let parsed = if DATE_SHAPE.is_match(trimmed) {
        NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
    } else {
        None
    };

    match parsed {
        Some(date) => Some(date.and_time(NaiveTime::MIN).and_utc()),
        None => {
            warn!(
                event = %event_name,
                date_text = %date_text,
                "Unparseable event date; storing the event without one"
            );
            None
        }
    }
}
