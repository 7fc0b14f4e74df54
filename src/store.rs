//! JSON persistence for scraped events.
//!
//! The store owns a single file holding the full event list as one JSON
//! array. Writes go through a sibling `.tmp` file and a rename so a reader
//! never observes a half-written document. Reads come in two flavours:
//! [`EventStore::try_load`] with typed errors for callers that need to
//! distinguish a missing file from a corrupt one, and [`EventStore::load`]
//! which degrades both cases to an empty list for read paths that must
//! stay up no matter what is on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info, instrument, warn};

use crate::error::StoreError;
use crate::models::Event;

/// Persistence handle for the canonical events document.
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored document with `events`, serialized as one JSON
    /// array. An empty slice is a valid document and overwrites stale data.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, events: &[Event]) -> Result<(), StoreError> {
        let json = serde_json::to_string(events)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Write to a sibling and rename so readers only ever see a
        // complete document.
        let tmp = self.tmp_path();
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        info!(count = events.len(), "Wrote events file");
        Ok(())
    }

    /// Load the stored events, reporting exactly why a read failed.
    pub async fn try_load(&self) -> Result<Vec<Event>, StoreError> {
        let body = fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(self.path.clone())
            } else {
                StoreError::Io(e)
            }
        })?;
        let events = serde_json::from_str(&body)?;
        Ok(events)
    }

    /// Load the stored events, treating every failure as "no events yet".
    ///
    /// A missing file is the normal state before the first scrape and only
    /// warrants a warning; anything else is logged as an error. Either way
    /// the caller gets an empty list and keeps serving.
    pub async fn load(&self) -> Vec<Event> {
        match self.try_load().await {
            Ok(events) => events,
            Err(StoreError::NotFound(_)) => {
                warn!(path = %self.path.display(), "Events file not found; treating as empty");
                Vec::new()
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read events file; treating as empty");
                Vec::new()
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn temp_store(tag: &str) -> EventStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        let path = std::env::temp_dir().join(format!(
            "wembley_store_{tag}_{}_{nanos}.json",
            std::process::id()
        ));
        EventStore::new(path)
    }

    fn cleanup(store: &EventStore) {
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = temp_store("round_trip");
        let events = vec![
            Event {
                name: "Concert".to_string(),
                date: Some(Utc.with_ymd_and_hms(2025, 8, 15, 0, 0, 0).unwrap()),
            },
            Event {
                name: "Unknown Event".to_string(),
                date: None,
            },
        ];

        store.save(&events).await.unwrap();
        let loaded = store.try_load().await.unwrap();

        assert_eq!(loaded, events);
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_save_writes_compact_json_array() {
        let store = temp_store("compact");
        let events = vec![Event {
            name: "Concert".to_string(),
            date: Some(Utc.with_ymd_and_hms(2025, 8, 15, 0, 0, 0).unwrap()),
        }];

        store.save(&events).await.unwrap();
        let on_disk = std::fs::read_to_string(store.path()).unwrap();

        assert_eq!(
            on_disk,
            r#"[{"name":"Concert","date":"2025-08-15T00:00:00Z"}]"#
        );
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_empty_list_overwrites_previous_contents() {
        let store = temp_store("overwrite");
        let events = vec![Event {
            name: "Old Show".to_string(),
            date: None,
        }];

        store.save(&events).await.unwrap();
        store.save(&[]).await.unwrap();

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk, "[]");
        assert!(store.load().await.is_empty());
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let store = temp_store("tmp_gone");
        store
            .save(&[Event {
                name: "Concert".to_string(),
                date: None,
            }])
            .await
            .unwrap();

        assert!(!store.tmp_path().exists());
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let store = temp_store("missing");

        let err = store.try_load().await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_degrades_to_empty() {
        let store = temp_store("malformed");
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.try_load().await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
        assert!(store.load().await.is_empty());
        cleanup(&store);
    }
}
