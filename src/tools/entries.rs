//! Entry MCP Tools
//!
//! Tools for loading the reconciled feed and normalizing ad-hoc batches.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::feed::{load_feed, Feed};
use crate::fetch::SourceFetcher;
use crate::models::{Confidence, NutritionEntry};
use crate::nutrition::{calorie_mismatch_issue, validate_calories, CALORIE_TOLERANCE_KCAL};
use crate::sources::{process_source, SourceKind};

/// Response for normalize_records
#[derive(Debug, Serialize)]
pub struct NormalizeRecordsResponse {
    pub source: SourceKind,
    pub count: usize,
    pub confidence_counts: ConfidenceCounts,
    pub entries: Vec<NutritionEntry>,
}

#[derive(Debug, Default, Serialize)]
pub struct ConfidenceCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ConfidenceCounts {
    pub fn tally(entries: &[NutritionEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            match entry.confidence {
                Confidence::High => counts.high += 1,
                Confidence::Medium => counts.medium += 1,
                Confidence::Low => counts.low += 1,
            }
        }
        counts
    }
}

/// Response for check_calories
#[derive(Debug, Serialize)]
pub struct CheckCaloriesResponse {
    pub is_valid: bool,
    pub expected: f64,
    pub reported: f64,
    pub difference: f64,
    pub tolerance: f64,
    pub issue: Option<String>,
}

/// Resolve source keys; None or an empty list means every source
pub fn parse_source_keys(keys: Option<&[String]>) -> Result<Vec<SourceKind>, String> {
    let keys = match keys {
        Some(keys) if !keys.is_empty() => keys,
        _ => return Ok(SourceKind::ALL.to_vec()),
    };

    let mut kinds = Vec::with_capacity(keys.len());
    for key in keys {
        let kind = SourceKind::from_key(key)
            .ok_or_else(|| format!("Unknown source '{}'. Valid sources: a, b, c, d", key))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// Load and merge entries from the requested sources
pub async fn get_entries(fetcher: Arc<dyn SourceFetcher>, sources: Option<&[String]>) -> Result<Feed, String> {
    let kinds = parse_source_keys(sources)?;
    Ok(load_feed(fetcher, &kinds).await)
}

/// Validate and normalize a batch of raw records for one source
pub fn normalize_records(source: &str, records: &Value) -> Result<NormalizeRecordsResponse, String> {
    let kind = SourceKind::from_key(source)
        .ok_or_else(|| format!("Unknown source '{}'. Valid sources: a, b, c, d", source))?;

    let entries = process_source(kind, records).map_err(|e| format!("Validation failed: {}", e))?;

    Ok(NormalizeRecordsResponse {
        source: kind,
        count: entries.len(),
        confidence_counts: ConfidenceCounts::tally(&entries),
        entries,
    })
}

/// Check reported calories against macros
pub fn check_calories(protein: f64, carbs: f64, fat: f64, calories: f64) -> CheckCaloriesResponse {
    let check = validate_calories(protein, carbs, fat, calories);
    CheckCaloriesResponse {
        is_valid: check.is_valid,
        expected: check.expected,
        reported: calories,
        difference: calories - check.expected,
        tolerance: CALORIE_TOLERANCE_KCAL,
        issue: (!check.is_valid).then(|| calorie_mismatch_issue(check.expected, calories)),
    }
}
