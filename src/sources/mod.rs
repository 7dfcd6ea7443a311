//! Upstream nutrition sources
//!
//! Each source has its own schema and quirks. A source module provides a
//! record type whose serde derive is the schema, and a normalizer that maps
//! it onto [`NutritionEntry`]. All sources are dispatched through
//! [`REGISTRY`]; adding a source means adding a [`SourceKind`] variant and
//! one registry row.

pub mod common;
pub mod source_a;
pub mod source_b;
pub mod source_c;
pub mod source_d;
pub mod validation;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::NutritionEntry;

pub use validation::ValidationError;

/// Identifies an upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    A,
    B,
    C,
    D,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [SourceKind::A, SourceKind::B, SourceKind::C, SourceKind::D];

    /// Retrieval key, also used as the entry id prefix
    pub fn key(&self) -> &'static str {
        match self {
            SourceKind::A => "a",
            SourceKind::B => "b",
            SourceKind::C => "c",
            SourceKind::D => "d",
        }
    }

    /// Human-readable label stored on each entry
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::A => "Source A",
            SourceKind::B => "Source B",
            SourceKind::C => "Source C",
            SourceKind::D => "Source D",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "a" => Some(SourceKind::A),
            "b" => Some(SourceKind::B),
            "c" => Some(SourceKind::C),
            "d" => Some(SourceKind::D),
            _ => None,
        }
    }

    /// Build an entry id of the form `{key}-{local_id}`
    pub fn entry_id(&self, local_id: &str) -> String {
        format!("{}-{}", self.key(), local_id)
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Schema + normalizer pair for one source
pub trait SourceAdapter {
    const KIND: SourceKind;

    /// The validated, coerced record; its `Deserialize` impl is the schema
    type Record: DeserializeOwned + Serialize;

    /// Map a validated record onto the unified entry
    fn normalize(record: &Self::Record) -> NutritionEntry;
}

/// Validate a whole raw batch for `S`
pub fn validate<S: SourceAdapter>(raw: &Value) -> Result<Vec<S::Record>, ValidationError> {
    validation::validate_batch(S::KIND, raw)
}

/// Validate then normalize a whole raw batch for `S`
pub fn process<S: SourceAdapter>(raw: &Value) -> Result<Vec<NutritionEntry>, ValidationError> {
    let records = validate::<S>(raw)?;
    let entries: Vec<NutritionEntry> = records.iter().map(S::normalize).collect();
    tracing::debug!(
        source = S::KIND.key(),
        entries = entries.len(),
        flagged = entries.iter().filter(|e| e.has_issues()).count(),
        "Normalized source batch"
    );
    Ok(entries)
}

/// One registry row
pub struct SourcePipeline {
    pub kind: SourceKind,
    pub process: fn(&Value) -> Result<Vec<NutritionEntry>, ValidationError>,
}

/// Pipelines indexed in [`SourceKind::ALL`] order
pub static REGISTRY: [SourcePipeline; 4] = [
    SourcePipeline {
        kind: SourceKind::A,
        process: process::<source_a::SourceA>,
    },
    SourcePipeline {
        kind: SourceKind::B,
        process: process::<source_b::SourceB>,
    },
    SourcePipeline {
        kind: SourceKind::C,
        process: process::<source_c::SourceC>,
    },
    SourcePipeline {
        kind: SourceKind::D,
        process: process::<source_d::SourceD>,
    },
];

/// Validate and normalize a raw batch for any source
pub fn process_source(kind: SourceKind, raw: &Value) -> Result<Vec<NutritionEntry>, ValidationError> {
    let pipeline = &REGISTRY[kind as usize];
    (pipeline.process)(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_matches_kind_order() {
        for (i, kind) in SourceKind::ALL.iter().enumerate() {
            assert_eq!(REGISTRY[i].kind, *kind);
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(SourceKind::from_key("a"), Some(SourceKind::A));
        assert_eq!(SourceKind::from_key(" D "), Some(SourceKind::D));
        assert_eq!(SourceKind::from_key("e"), None);
    }

    #[test]
    fn test_kind_serializes_as_key() {
        assert_eq!(serde_json::to_string(&SourceKind::C).unwrap(), "\"c\"");
    }

    #[test]
    fn test_process_source_dispatches_by_kind() {
        let raw = json!([{
            "id": "d1",
            "time": "2024-03-01T12:00:00Z",
            "food": "Rice",
            "serving": {"amount": 100, "unit": "g"},
            "macros": {"protein_g": 2.7, "carbs_g": 28.0, "fat_g": 0.3},
            "calories_kcal": 130
        }]);
        let entries = process_source(SourceKind::D, &raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "d-d1");
        assert_eq!(entries[0].source, "Source D");

        let err = process_source(SourceKind::A, &raw).unwrap_err();
        assert_eq!(err.kind(), SourceKind::A);
        assert_eq!(err.index(), Some(0));
    }
}
