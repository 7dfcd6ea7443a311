//! Source B
//!
//! Loosely typed: macros arrive as strings, calories may be missing, and the
//! serving is a single free-text string such as "150 g".

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::models::{EntryBase, Macros, NutritionEntry, RawRecord};
use crate::nutrition::{atwater_calories, build_entry, parse_leading_float, parse_serving_text};

use super::{SourceAdapter, SourceKind};

pub const CALORIES_DERIVED_ISSUE: &str = "Calories missing from source, calculated from macros";

/// A validated Source B record, with string fields already coerced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBRecord {
    pub id: String,
    #[serde(rename = "loggedAt")]
    pub logged_at: String,
    pub name: String,
    #[serde(rename = "servingSize")]
    pub serving_size: String,
    #[serde(deserialize_with = "text_macros")]
    pub macros: Macros,
    /// None when the source sent null, nothing, or no usable number
    #[serde(default, deserialize_with = "text_calories")]
    pub calories: Option<f64>,
    /// Free-form, but an object when present
    #[serde(default, deserialize_with = "present_object", skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// Macros as sent: `{protein, carbs, fat}` strings
#[derive(Deserialize)]
struct MacroText {
    #[serde(deserialize_with = "text_macro")]
    protein: f64,
    #[serde(deserialize_with = "text_macro")]
    carbs: f64,
    #[serde(deserialize_with = "text_macro")]
    fat: f64,
}

/// Numeric prefix of a macro string; 0 when there is none
fn text_macro<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let text = String::deserialize(deserializer)?;
    Ok(parse_leading_float(&text).unwrap_or(0.0))
}

fn text_macros<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Macros, D::Error> {
    let text = MacroText::deserialize(deserializer)?;
    Ok(Macros::new(text.protein, text.carbs, text.fat))
}

fn text_calories<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text
        .filter(|s| !s.is_empty())
        .and_then(|s| parse_leading_float(&s)))
}

fn present_object<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error> {
    Map::deserialize(deserializer).map(Some)
}

pub struct SourceB;

impl SourceAdapter for SourceB {
    const KIND: SourceKind = SourceKind::B;
    type Record = SourceBRecord;

    fn normalize(record: &SourceBRecord) -> NutritionEntry {
        let mut issues = Vec::new();

        let calories = match record.calories {
            Some(calories) => calories,
            None => {
                issues.push(CALORIES_DERIVED_ISSUE.to_string());
                atwater_calories(&record.macros)
            }
        };

        build_entry(
            EntryBase {
                id: SourceKind::B.entry_id(&record.id),
                source: SourceKind::B.label(),
                name: record.name.clone(),
                timestamp: record.logged_at.clone(),
                serving: parse_serving_text(&record.serving_size),
                macros: record.macros,
                calories,
                raw: RawRecord::capture(record),
            },
            issues,
        )
    }
}
