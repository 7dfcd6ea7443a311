//! Nutrition calculation module
//!
//! Calorie consistency checks, lenient value parsing, and the shared entry
//! builder.

pub mod builder;
pub mod calories;
pub mod parse;

pub use builder::{build_entry, calorie_mismatch_issue, NEGATIVE_VALUES_ISSUE};
pub use calories::{
    atwater_calories, validate_calories, CalorieCheck, CALORIE_TOLERANCE_KCAL,
    CARBS_KCAL_PER_GRAM, FAT_KCAL_PER_GRAM, PROTEIN_KCAL_PER_GRAM,
};
pub use parse::{parse_leading_float, parse_serving_text};
