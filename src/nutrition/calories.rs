//! Calorie consistency checks
//!
//! Compares reported calories against the energy implied by the macros.

use serde::Serialize;

use crate::models::Macros;

/// kcal per gram of protein
pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
/// kcal per gram of carbohydrate
pub const CARBS_KCAL_PER_GRAM: f64 = 4.0;
/// kcal per gram of fat
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

/// Maximum absolute difference (kcal) between expected and reported calories
pub const CALORIE_TOLERANCE_KCAL: f64 = 10.0;

/// Outcome of a calorie consistency check
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalorieCheck {
    pub is_valid: bool,
    /// Calories implied by the macros (unrounded)
    pub expected: f64,
}

/// Energy implied by macros using Atwater factors
pub fn atwater_calories(macros: &Macros) -> f64 {
    macros.protein * PROTEIN_KCAL_PER_GRAM
        + macros.carbs * CARBS_KCAL_PER_GRAM
        + macros.fat * FAT_KCAL_PER_GRAM
}

/// Check reported calories against the macros within a fixed kcal tolerance
pub fn validate_calories(protein: f64, carbs: f64, fat: f64, calories: f64) -> CalorieCheck {
    let expected = atwater_calories(&Macros::new(protein, carbs, fat));
    CalorieCheck {
        is_valid: (expected - calories).abs() <= CALORIE_TOLERANCE_KCAL,
        expected,
    }
}
