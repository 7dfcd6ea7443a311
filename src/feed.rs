//! Reconciled entry feed
//!
//! Runs one task per source (fetch, validate, normalize), waits for all of
//! them, and merges whatever succeeded into a single list ordered newest
//! first. A failing source never hides the others; the feed status records
//! whether the result is complete.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::fetch::{FetchError, SourceFetcher};
use crate::models::NutritionEntry;
use crate::sources::{process_source, SourceKind, ValidationError};

/// Why a source contributed no entries
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Source {kind} task aborted: {message}")]
    Aborted { kind: SourceKind, message: String },
}

/// Result of one source pipeline
pub type SourceOutcome = Result<Vec<NutritionEntry>, SourceError>;

/// Overall state of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    /// No source has reported yet
    Loading,
    /// Every requested source loaded
    Complete,
    /// Some sources failed; the entries shown are incomplete
    Partial,
    /// Every requested source loaded but none had entries
    Empty,
    /// Every requested source failed
    Unavailable,
}

impl FeedStatus {
    fn from_counts(loaded: usize, failed: usize, entries: usize) -> Self {
        match (loaded, failed) {
            (0, 0) => FeedStatus::Loading,
            (0, _) => FeedStatus::Unavailable,
            (_, 0) if entries == 0 => FeedStatus::Empty,
            (_, 0) => FeedStatus::Complete,
            _ => FeedStatus::Partial,
        }
    }

    /// True when at least one source is missing from the results
    pub fn is_incomplete(&self) -> bool {
        matches!(self, FeedStatus::Partial | FeedStatus::Unavailable)
    }
}

/// Per-source result summary
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SourceState {
    Loaded { entries: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    pub label: &'static str,
    #[serde(flatten)]
    pub state: SourceState,
}

/// Merged entries plus per-source outcomes
#[derive(Debug, Clone, Serialize)]
pub struct Feed {
    pub status: FeedStatus,
    pub incomplete: bool,
    pub entries: Vec<NutritionEntry>,
    pub sources: Vec<SourceReport>,
    /// Ids shared by more than one entry
    pub duplicate_ids: Vec<String>,
}

impl Feed {
    pub fn loading() -> Self {
        Self {
            status: FeedStatus::Loading,
            incomplete: false,
            entries: Vec::new(),
            sources: Vec::new(),
            duplicate_ids: Vec::new(),
        }
    }
}

/// Fetch, validate, and normalize a single source
pub async fn load_source(fetcher: &dyn SourceFetcher, kind: SourceKind) -> SourceOutcome {
    let raw = fetcher.fetch(kind).await?;
    Ok(process_source(kind, &raw)?)
}

/// Load the given sources concurrently and merge the results
pub async fn load_feed(fetcher: Arc<dyn SourceFetcher>, kinds: &[SourceKind]) -> Feed {
    let tasks: Vec<_> = kinds
        .iter()
        .map(|&kind| {
            let fetcher = Arc::clone(&fetcher);
            let handle = tokio::spawn(async move { load_source(fetcher.as_ref(), kind).await });
            (kind, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for (kind, handle) in tasks {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(SourceError::Aborted {
                kind,
                message: e.to_string(),
            }),
        };
        outcomes.push((kind, outcome));
    }

    merge(outcomes)
}

/// Merge per-source outcomes into a feed sorted newest first
///
/// Entries with equal or unparsable timestamps keep source order;
/// unparsable timestamps sort last.
pub fn merge(outcomes: Vec<(SourceKind, SourceOutcome)>) -> Feed {
    let mut entries = Vec::new();
    let mut sources = Vec::with_capacity(outcomes.len());
    let mut loaded = 0;
    let mut failed = 0;

    for (kind, outcome) in outcomes {
        let state = match outcome {
            Ok(batch) => {
                tracing::info!(source = kind.key(), entries = batch.len(), "Source loaded");
                loaded += 1;
                let count = batch.len();
                entries.extend(batch);
                SourceState::Loaded { entries: count }
            }
            Err(e) => {
                tracing::warn!(source = kind.key(), error = %e, "Source failed");
                failed += 1;
                SourceState::Failed {
                    error: e.to_string(),
                }
            }
        };
        sources.push(SourceReport {
            source: kind,
            label: kind.label(),
            state,
        });
    }

    entries.sort_by_cached_key(|entry| Reverse(parse_timestamp(&entry.timestamp)));

    let duplicate_ids = find_duplicate_ids(&entries);
    if !duplicate_ids.is_empty() {
        tracing::warn!(ids = ?duplicate_ids, "Entries share an id");
    }

    let status = FeedStatus::from_counts(loaded, failed, entries.len());

    Feed {
        status,
        incomplete: status.is_incomplete(),
        entries,
        sources,
        duplicate_ids,
    }
}

fn find_duplicate_ids(entries: &[NutritionEntry]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.id.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Parse an entry timestamp for ordering
///
/// Accepts RFC 3339, offset-less date-times (taken as UTC), and plain dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Serves canned batches; unknown sources answer 404
    struct StaticFetcher {
        batches: HashMap<SourceKind, Value>,
    }

    #[async_trait]
    impl SourceFetcher for StaticFetcher {
        async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError> {
            self.batches
                .get(&kind)
                .cloned()
                .ok_or(FetchError::Status { kind, status: 404 })
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    struct PanickingFetcher;

    #[async_trait]
    impl SourceFetcher for PanickingFetcher {
        async fn fetch(&self, kind: SourceKind) -> Result<Value, FetchError> {
            if kind == SourceKind::B {
                panic!("upstream client bug");
            }
            Ok(json!([]))
        }

        fn describe(&self) -> String {
            "panicking".to_string()
        }
    }

    fn source_a(id: &str, timestamp: &str) -> Value {
        json!({
            "entryId": id,
            "timestamp": timestamp,
            "foodName": "Eggs",
            "serving": {"amount": 2, "unit": "large"},
            "macros": {"protein_g": 12, "carbs_g": 1, "fat_g": 10},
            "calories_kcal": 142
        })
    }

    fn source_b(id: &str, logged_at: &str) -> Value {
        json!({
            "id": id,
            "loggedAt": logged_at,
            "name": "Toast",
            "servingSize": "2 slices",
            "macros": {"protein": "6", "carbs": "28", "fat": "2"},
            "calories": null
        })
    }

    fn source_c(logged_at: &str, label: &str) -> Value {
        json!({
            "source": "scale",
            "item": {"label": label, "brand": "Acme"},
            "logged_at": logged_at,
            "serving_grams": 30,
            "nutrients": [{"key": "energy", "value": 0, "unit": "kcal"}]
        })
    }

    fn fetcher(batches: Vec<(SourceKind, Value)>) -> Arc<dyn SourceFetcher> {
        Arc::new(StaticFetcher {
            batches: batches.into_iter().collect(),
        })
    }

    #[tokio::test]
    async fn test_merges_and_sorts_newest_first() {
        let fetcher = fetcher(vec![
            (SourceKind::A, json!([source_a("1", "2024-01-15T08:00:00Z"), source_a("2", "2024-01-15T20:00:00Z")])),
            (SourceKind::B, json!([source_b("9", "2024-01-15T12:00:00Z")])),
            (SourceKind::C, json!([])),
            (SourceKind::D, json!([])),
        ]);

        let feed = load_feed(fetcher, &SourceKind::ALL).await;
        let ids: Vec<&str> = feed.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a-2", "b-9", "a-1"]);
        assert_eq!(feed.status, FeedStatus::Complete);
        assert!(!feed.incomplete);
        assert_eq!(feed.sources.len(), 4);
    }

    #[tokio::test]
    async fn test_schema_failure_does_not_hide_other_sources() {
        let mut broken = source_a("3", "2024-01-15T09:00:00Z");
        broken["calories_kcal"] = json!("142");
        let fetcher = fetcher(vec![
            (SourceKind::A, json!([broken])),
            (SourceKind::B, json!([source_b("9", "2024-01-15T12:00:00Z")])),
            (SourceKind::C, json!([source_c("2024-01-14T12:00:00Z", "Oats")])),
        ]);

        let feed = load_feed(fetcher, &SourceKind::ALL).await;
        let ids: Vec<&str> = feed.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b-9", "c-2024-01-14T12:00:00Z-Oats"]);
        assert_eq!(feed.status, FeedStatus::Partial);
        assert!(feed.incomplete);

        match &feed.sources[0].state {
            SourceState::Failed { error } => assert!(error.contains("calories_kcal")),
            other => panic!("expected failure, got {:?}", other),
        }
        match &feed.sources[3].state {
            SourceState::Failed { error } => assert_eq!(error, "Failed to fetch source d: HTTP 404"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panicking_source_is_isolated() {
        let feed = load_feed(Arc::new(PanickingFetcher), &[SourceKind::A, SourceKind::B]).await;
        assert_eq!(feed.status, FeedStatus::Partial);
        assert!(matches!(feed.sources[0].state, SourceState::Loaded { entries: 0 }));
        assert!(matches!(feed.sources[1].state, SourceState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_all_failed_is_unavailable() {
        let feed = load_feed(fetcher(vec![]), &SourceKind::ALL).await;
        assert_eq!(feed.status, FeedStatus::Unavailable);
        assert!(feed.entries.is_empty());
    }

    #[tokio::test]
    async fn test_no_entries_is_empty() {
        let fetcher = fetcher(vec![(SourceKind::A, json!([])), (SourceKind::D, json!([]))]);
        let feed = load_feed(fetcher, &[SourceKind::A, SourceKind::D]).await;
        assert_eq!(feed.status, FeedStatus::Empty);
        assert!(!feed.incomplete);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(FeedStatus::Unavailable).unwrap(), json!("unavailable"));
        assert_eq!(serde_json::to_value(Feed::loading()).unwrap()["status"], "loading");
    }

    #[test]
    fn test_nothing_reported_is_loading() {
        let feed = merge(vec![]);
        assert_eq!(feed.status, FeedStatus::Loading);
        assert_eq!(Feed::loading().status, FeedStatus::Loading);
    }

    #[tokio::test]
    async fn test_colliding_source_c_ids_are_reported() {
        let fetcher = fetcher(vec![(
            SourceKind::C,
            json!([
                source_c("2024-01-14T12:00:00Z", "Oats"),
                source_c("2024-01-14T12:00:00Z", "Oats"),
                source_c("2024-01-14T12:00:00Z", "Milk"),
            ]),
        )]);
        let feed = load_feed(fetcher, &[SourceKind::C]).await;
        assert_eq!(feed.entries.len(), 3);
        assert_eq!(feed.duplicate_ids, vec!["c-2024-01-14T12:00:00Z-Oats".to_string()]);
    }

    #[test]
    fn test_unparsable_timestamps_sort_last_in_source_order() {
        let feed = merge(vec![
            (
                SourceKind::B,
                Ok(crate::sources::process_source(
                    SourceKind::B,
                    &json!([
                        source_b("x", "yesterday"),
                        source_b("y", "2024-01-01"),
                        source_b("z", "sometime"),
                    ]),
                )
                .unwrap()),
            ),
        ]);
        let ids: Vec<&str> = feed.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b-y", "b-x", "b-z"]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let utc = parse_timestamp("2024-01-15T08:30:00Z").unwrap();
        assert_eq!(parse_timestamp("2024-01-15T10:30:00+02:00"), Some(utc));
        assert_eq!(parse_timestamp("2024-01-15T08:30:00"), Some(utc));
        assert_eq!(parse_timestamp("2024-01-15 08:30:00"), Some(utc));
        assert!(parse_timestamp("2024-01-15").is_some());
        assert_eq!(parse_timestamp("not a date"), None);
    }
}
