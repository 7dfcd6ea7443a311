//! Field shapes shared by more than one source schema

use serde::{Deserialize, Serialize};

use crate::models::Macros;

/// Macros reported as `{protein_g, carbs_g, fat_g}` numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GramMacros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl GramMacros {
    pub fn to_macros(&self) -> Macros {
        Macros::new(self.protein_g, self.carbs_g, self.fat_g)
    }
}
