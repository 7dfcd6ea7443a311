//! Entry builder
//!
//! Runs the shared data-quality checks over a normalized entry and derives
//! its confidence. Every source normalizer finishes here.

use crate::models::{Confidence, EntryBase, NutritionEntry};

use super::calories::validate_calories;

/// Issue text for entries carrying negative macros or calories
pub const NEGATIVE_VALUES_ISSUE: &str = "Negative values detected (Correction entry)";

/// Issue text for a macro/calorie disagreement
///
/// Expected calories are rounded to the nearest integer (halves round up);
/// reported calories are shown as given.
pub fn calorie_mismatch_issue(expected: f64, calories: f64) -> String {
    format!(
        "Calorie mismatch: expected ~{} kcal, got {} kcal",
        round_half_up(expected),
        display_number(calories)
    )
}

fn round_half_up(value: f64) -> f64 {
    display_number((value + 0.5).floor())
}

// Avoid printing "-0"
fn display_number(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Finish an entry: append quality issues after `source_issues` and derive
/// confidence from the worst issue found
pub fn build_entry(base: EntryBase, source_issues: Vec<String>) -> NutritionEntry {
    let mut issues = source_issues;
    let mut confidence = Confidence::High;

    let macros = base.macros;
    if macros.has_negative() || base.calories < 0.0 {
        issues.push(NEGATIVE_VALUES_ISSUE.to_string());
        confidence = confidence.capped_at(Confidence::Medium);
    }

    let check = validate_calories(macros.protein, macros.carbs, macros.fat, base.calories);
    if !check.is_valid {
        issues.push(calorie_mismatch_issue(check.expected, base.calories));
        confidence = confidence.capped_at(Confidence::Low);
    }

    NutritionEntry {
        id: base.id,
        source: base.source.to_string(),
        name: base.name,
        timestamp: base.timestamp,
        serving: base.serving,
        macros: base.macros,
        calories: base.calories,
        confidence,
        issues,
        raw: base.raw,
    }
}
