//! Shared macronutrient structure
//!
//! Used by every source normalizer and the entry builder.

use serde::{Deserialize, Serialize};

/// Macronutrients in grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    pub fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self { protein, carbs, fat }
    }

    /// Create a new Macros with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale macro values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
        }
    }

    /// True if any macro is below zero
    pub fn has_negative(&self) -> bool {
        self.protein < 0.0 || self.carbs < 0.0 || self.fat < 0.0
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, other: Macros) -> Macros {
        Macros {
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl std::ops::Mul<f64> for Macros {
    type Output = Macros;

    fn mul(self, multiplier: f64) -> Macros {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Macros::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale() {
        let m = Macros::new(20.0, 10.0, 4.0) * 1.5;
        assert_eq!(m, Macros::new(30.0, 15.0, 6.0));
    }

    #[test]
    fn test_sum() {
        let total: Macros = vec![Macros::new(1.0, 2.0, 3.0), Macros::new(4.0, 5.0, 6.0)]
            .into_iter()
            .sum();
        assert_eq!(total, Macros::new(5.0, 7.0, 9.0));
    }

    #[test]
    fn test_has_negative() {
        assert!(!Macros::new(0.0, 1.0, 2.0).has_negative());
        assert!(Macros::new(0.0, -1.0, 2.0).has_negative());
    }
}
