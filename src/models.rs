//! Data models for scraped events.
//!
//! This module defines the two shapes an event passes through on its way
//! from the stadium's HTML to the stored JSON document:
//! - [`EventDraft`]: raw extraction output, date still free text
//! - [`Event`]: the canonical record with a normalized UTC timestamp
//!
//! The stored document is a plain JSON array of [`Event`] objects with the
//! schema `{"name": string, "date": string|null}`, where `date` (when
//! present) is an RFC 3339 timestamp with the `Z` designator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used when an event block carries no recognizable heading.
pub const UNKNOWN_EVENT: &str = "Unknown Event";

/// Date text used when an event block carries no date node. Deliberately
/// unparseable so normalization turns it into an absent date.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// An event as extracted from the listing page, before date normalization.
///
/// The `date_text` field holds whatever the page said verbatim (for example
/// `"15 Aug 2025"`), or [`UNKNOWN_DATE`] when the block had no date node.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Event name from the block's heading, or [`UNKNOWN_EVENT`].
    pub name: String,
    /// Raw date text from the block, or [`UNKNOWN_DATE`].
    pub date_text: String,
}

/// A canonical event record as persisted and served.
///
/// `date` is `None` when the source date text could not be parsed; a missing
/// or malformed date is never replaced with a fabricated one. Events carry
/// no identity beyond their position in the stored array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Display name of the event.
    pub name: String,
    /// Event date at midnight UTC, if the source date was parseable.
    pub date: Option<DateTime<Utc>>,
}

impl Event {
    /// Whether this event carries a normalized date.
    pub fn is_dated(&self) -> bool {
        self.date.is_some()
    }
}
