//! Source D
//!
//! Strictly typed, but macros and calories may be stated per 100 g instead of
//! per serving. Per-100g values are scaled to the logged serving.

use serde::{Deserialize, Serialize};

use crate::models::{EntryBase, NutritionEntry, RawRecord, Serving};
use crate::nutrition::build_entry;

use super::common::GramMacros;
use super::{SourceAdapter, SourceKind};

pub const PER_100G_ADJUSTED_ISSUE: &str = "Values adjusted from per-100g basis to serving size";

/// What quantity the reported macros and calories refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MacrosBasis {
    #[default]
    #[serde(rename = "per_serving")]
    PerServing,
    #[serde(rename = "per_100g")]
    Per100g,
}

/// A validated Source D record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDRecord {
    pub id: String,
    pub time: String,
    pub food: String,
    pub serving: Serving,
    pub macros: GramMacros,
    pub calories_kcal: f64,
    #[serde(default)]
    pub macros_basis: MacrosBasis,
}

pub struct SourceD;

impl SourceAdapter for SourceD {
    const KIND: SourceKind = SourceKind::D;
    type Record = SourceDRecord;

    fn normalize(record: &SourceDRecord) -> NutritionEntry {
        let mut issues = Vec::new();
        let mut macros = record.macros.to_macros();
        let mut calories = record.calories_kcal;

        if record.macros_basis == MacrosBasis::Per100g {
            let factor = record.serving.amount / 100.0;
            macros = macros * factor;
            calories *= factor;
            issues.push(PER_100G_ADJUSTED_ISSUE.to_string());
        }

        build_entry(
            EntryBase {
                id: SourceKind::D.entry_id(&record.id),
                source: SourceKind::D.label(),
                name: record.food.clone(),
                timestamp: record.time.clone(),
                serving: record.serving.clone(),
                macros,
                calories,
                raw: RawRecord::capture(record),
            },
            issues,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, Macros};
    use crate::sources::{process, validate};
    use serde_json::{json, Value};

    fn raw_record(basis: Option<&str>) -> Value {
        let mut record = json!({
            "id": "log-9",
            "time": "2024-01-15T19:10:00Z",
            "food": "Salmon",
            "serving": {"amount": 150, "unit": "g"},
            "macros": {"protein_g": 20, "carbs_g": 0, "fat_g": 13},
            "calories_kcal": 197
        });
        if let Some(basis) = basis {
            record["macros_basis"] = json!(basis);
        }
        record
    }

    #[test]
    fn test_per_100g_is_scaled_to_serving() {
        let entries = process::<SourceD>(&json!([raw_record(Some("per_100g"))])).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.id, "d-log-9");
        assert_eq!(entry.macros, Macros::new(30.0, 0.0, 19.5));
        assert_eq!(entry.calories, 295.5);
        assert_eq!(entry.issues, vec![PER_100G_ADJUSTED_ISSUE.to_string()]);
        assert_eq!(entry.confidence, Confidence::High);
        assert_eq!(entry.serving, Serving::new(150.0, "g"));
    }

    #[test]
    fn test_per_serving_is_passthrough() {
        for record in [raw_record(Some("per_serving")), raw_record(None)] {
            let entries = process::<SourceD>(&json!([record])).unwrap();
            let entry = &entries[0];
            assert_eq!(entry.macros, Macros::new(20.0, 0.0, 13.0));
            assert_eq!(entry.calories, 197.0);
            assert!(entry.issues.is_empty());
            assert_eq!(entry.confidence, Confidence::High);
        }
    }

    #[test]
    fn test_default_basis_is_recorded_in_raw() {
        let entries = process::<SourceD>(&json!([raw_record(None)])).unwrap();
        assert_eq!(entries[0].raw.as_value()["macros_basis"], "per_serving");
    }

    #[test]
    fn test_unknown_basis_is_rejected() {
        let err = validate::<SourceD>(&json!([raw_record(Some("per_cup"))])).unwrap_err();
        assert_eq!(err.path(), "macros_basis");
        assert_eq!(err.index(), Some(0));
        assert_eq!(
            err.reason(),
            "unknown variant `per_cup`, expected `per_serving` or `per_100g`"
        );
    }

    #[test]
    fn test_null_basis_is_rejected() {
        let mut record = raw_record(None);
        record["macros_basis"] = Value::Null;
        let err = validate::<SourceD>(&json!([record])).unwrap_err();
        assert_eq!(err.path(), "macros_basis");
    }

    #[test]
    fn test_scaled_mismatch_keeps_issue_order() {
        let mut record = raw_record(Some("per_100g"));
        record["calories_kcal"] = json!(100);
        let entries = process::<SourceD>(&json!([record])).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.issues[0], PER_100G_ADJUSTED_ISSUE);
        assert_eq!(
            entry.issues[1],
            "Calorie mismatch: expected ~296 kcal, got 150 kcal"
        );
        assert_eq!(entry.confidence, Confidence::Low);
    }
}
