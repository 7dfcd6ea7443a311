//! UNC Status Tool
//!
//! Provides runtime status information about the UNC service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::feed::FeedStatus;

/// How entries are reconciled, for AI assistants reading the feed
pub const RECONCILIATION_INSTRUCTIONS: &str = r#"
# UNC Reconciliation Guide

UNC merges nutrition log entries from four upstream sources into one feed.
Every entry carries a `confidence` and a list of `issues`. Read both before
trusting the numbers.

## Tools

- `get_entries` - Fetch, validate and merge all sources (or a subset via `sources: ["a", "c"]`)
- `normalize_records` - Normalize a raw JSON array for one source without fetching
- `check_calories` - Check a set of macros against reported calories
- `unc_status` - Build, schema fingerprint, process, and last-feed status

## Confidence

| confidence | meaning |
|------------|---------|
| **high** | No anomalies detected |
| **medium** | Negative values (a correction entry cancelling an earlier log) |
| **low** | Calories disagree with the macros by more than 10 kcal |

Confidence only ever goes down. An entry with both negative values and a
calorie mismatch is **low**.

Expected calories use Atwater factors:
`protein * 4 + carbs * 4 + fat * 9`

## Issues by source

| Source | Issue | Meaning |
|--------|-------|---------|
| A | - | Clean source, passthrough |
| B | "Calories missing from source, calculated from macros" | Calories were derived, so the calorie check cannot fail |
| B | - | Servings like "150 g" are split into amount/unit; "bowl" becomes amount 0 |
| C | "Duplicate nutrient entry for {key}: summed values" | A nutrient was reported more than once and the values were added |
| D | "Values adjusted from per-100g basis to serving size" | Macros and calories were scaled by serving amount / 100 |

## Feed status

- **complete** - every requested source loaded
- **partial** - some sources failed; entries are shown but incomplete
- **empty** - every source loaded, none had entries
- **unavailable** - every source failed
- **loading** - a refresh is still running

A source that fails schema validation contributes no entries, but never
blocks the other sources. Check `sources[].error` for the failing field.

## Ids

Entry ids are `{source}-{source id}`. Source C has no id of its own, so its
entries use `c-{logged_at}-{label}`. Two identical items logged in the same
second share an id; these are listed in `duplicate_ids`.
"#;

/// Runtime status of the UNC service
#[derive(Debug, Clone, Serialize)]
pub struct UncStatus {
    /// Build information
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub schema_fingerprint: &'static str,
    pub sources: Vec<&'static str>,

    /// Where source batches are fetched from
    pub source_mode: String,
    /// Status of the most recent feed, None before the first request
    pub last_feed: Option<FeedStatus>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    source_mode: String,
    last_feed: Option<FeedStatus>,
}

impl StatusTracker {
    pub fn new(source_mode: String) -> Self {
        Self {
            start_time: Instant::now(),
            source_mode,
            last_feed: None,
        }
    }

    /// Record the state of the latest feed request
    pub fn record_feed(&mut self, status: FeedStatus) {
        self.last_feed = Some(status);
    }

    pub fn get_status(&self) -> UncStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        UncStatus {
            version: build_info.version,
            build_timestamp: build_info.build_timestamp,
            schema_fingerprint: build_info.schema_fingerprint,
            sources: build_info.sources,
            source_mode: self.source_mode.clone(),
            last_feed: self.last_feed,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
