//! Source A
//!
//! The well-behaved source: strict types, ISO-8601 UTC timestamps, macros in
//! grams and calories in kcal. Everything maps straight through.

use chrono::DateTime;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::models::{EntryBase, NutritionEntry, RawRecord, Serving};
use crate::nutrition::build_entry;

use super::common::GramMacros;
use super::{SourceAdapter, SourceKind};

/// A validated Source A record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceARecord {
    #[serde(rename = "entryId")]
    pub entry_id: String,
    #[serde(deserialize_with = "utc_datetime")]
    pub timestamp: String,
    #[serde(rename = "foodName")]
    pub food_name: String,
    pub serving: Serving,
    pub macros: GramMacros,
    pub calories_kcal: f64,
}

/// True for `YYYY-MM-DDTHH:MM:SS[.fff]Z`
fn is_utc_datetime(value: &str) -> bool {
    value.ends_with('Z')
        && value.as_bytes().get(10) == Some(&b'T')
        && DateTime::parse_from_rfc3339(value).is_ok()
}

fn utc_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    if is_utc_datetime(&value) {
        Ok(value)
    } else {
        Err(de::Error::custom("invalid datetime"))
    }
}

pub struct SourceA;

impl SourceAdapter for SourceA {
    const KIND: SourceKind = SourceKind::A;
    type Record = SourceARecord;

    fn normalize(record: &SourceARecord) -> NutritionEntry {
        build_entry(
            EntryBase {
                id: SourceKind::A.entry_id(&record.entry_id),
                source: SourceKind::A.label(),
                name: record.food_name.clone(),
                timestamp: record.timestamp.clone(),
                serving: record.serving.clone(),
                macros: record.macros.to_macros(),
                calories: record.calories_kcal,
                raw: RawRecord::capture(record),
            },
            Vec::new(),
        )
    }
}
