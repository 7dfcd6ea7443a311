//! Unified nutrition entry model
//!
//! The single shape every source is normalized into.

use serde::{Deserialize, Serialize};

use super::Macros;

/// Trust tier derived from the data-quality checks
///
/// Variants are declared worst-first so `min` picks the most severe tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// Lower this tier to `cap` if `cap` is worse; never raises it
    pub fn capped_at(self, cap: Confidence) -> Confidence {
        self.min(cap)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::High
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serving size as reported (or derived) for an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serving {
    pub amount: f64,
    pub unit: String,
}

impl Serving {
    pub fn new(amount: f64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
        }
    }
}

/// The validated source record an entry was built from.
///
/// Kept for traceability only. Nothing outside the owning normalizer
/// inspects its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(serde_json::Value);

impl RawRecord {
    /// Capture a validated record. Serialization of plain data records
    /// cannot fail, so a failure degrades to `null` rather than aborting.
    pub fn capture<T: Serialize>(record: &T) -> Self {
        Self(serde_json::to_value(record).unwrap_or(serde_json::Value::Null))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Everything a normalizer knows about an entry before quality checks run
#[derive(Debug, Clone, PartialEq)]
pub struct EntryBase {
    pub id: String,
    pub source: &'static str,
    pub name: String,
    pub timestamp: String,
    pub serving: Serving,
    pub macros: Macros,
    pub calories: f64,
    pub raw: RawRecord,
}

/// A normalized, quality-annotated nutrition log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    pub id: String,
    pub source: String,
    pub name: String,
    pub timestamp: String,
    pub serving: Serving,
    pub macros: Macros,
    pub calories: f64,
    pub confidence: Confidence,
    pub issues: Vec<String>,
    pub raw: RawRecord,
}

impl NutritionEntry {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
