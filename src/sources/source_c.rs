//! Source C
//!
//! Reports nutrients as a flat list of `{key, value, unit}` tuples instead of
//! a fixed macro object, sometimes repeating a key. Repeated keys are summed.
//! Records have no unique id of their own.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{EntryBase, Macros, NutritionEntry, RawRecord, Serving};
use crate::nutrition::build_entry;

use super::{SourceAdapter, SourceKind};

pub const NUTRIENT_PROTEIN: &str = "protein";
pub const NUTRIENT_CARBS: &str = "carbohydrate";
pub const NUTRIENT_FAT: &str = "fat";
pub const NUTRIENT_ENERGY: &str = "energy";

pub fn duplicate_nutrient_issue(key: &str) -> String {
    format!("Duplicate nutrient entry for {}: summed values", key)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCItem {
    pub label: String,
    pub brand: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub key: String,
    pub value: f64,
    pub unit: String,
}

/// A validated Source C record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCRecord {
    pub source: String,
    pub item: SourceCItem,
    pub logged_at: String,
    pub serving_grams: f64,
    pub nutrients: Vec<Nutrient>,
}

/// Per-key nutrient totals plus the duplicate issues found while summing
pub struct NutrientTotals {
    totals: HashMap<String, f64>,
    pub issues: Vec<String>,
}

impl NutrientTotals {
    /// Sum nutrient values by key; each key that repeats yields one issue,
    /// recorded when its first repeat is seen
    pub fn sum(nutrients: &[Nutrient]) -> Self {
        let mut totals: HashMap<String, f64> = HashMap::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut issues = Vec::new();

        for nutrient in nutrients {
            *totals.entry(nutrient.key.clone()).or_insert(0.0) += nutrient.value;

            let count = counts.entry(nutrient.key.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                issues.push(duplicate_nutrient_issue(&nutrient.key));
            }
        }

        Self { totals, issues }
    }

    /// Total for a key, 0 when absent
    pub fn get(&self, key: &str) -> f64 {
        self.totals.get(key).copied().unwrap_or(0.0)
    }
}

pub struct SourceC;

impl SourceAdapter for SourceC {
    const KIND: SourceKind = SourceKind::C;
    type Record = SourceCRecord;

    fn normalize(record: &SourceCRecord) -> NutritionEntry {
        let totals = NutrientTotals::sum(&record.nutrients);

        let macros = Macros::new(
            totals.get(NUTRIENT_PROTEIN),
            totals.get(NUTRIENT_CARBS),
            totals.get(NUTRIENT_FAT),
        );

        // No natural key: timestamp + label can collide for same-second logs
        let local_id = format!("{}-{}", record.logged_at, record.item.label);

        build_entry(
            EntryBase {
                id: SourceKind::C.entry_id(&local_id),
                source: SourceKind::C.label(),
                name: format!("{} {}", record.item.brand, record.item.label),
                timestamp: record.logged_at.clone(),
                serving: Serving::new(record.serving_grams, "g"),
                macros,
                calories: totals.get(NUTRIENT_ENERGY),
                raw: RawRecord::capture(record),
            },
            totals.issues,
        )
    }
}
