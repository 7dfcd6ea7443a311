//! Structural validation of raw source batches
//!
//! Each source's record type carries its schema as a serde derive. A raw batch
//! is deserialized as `Vec<Record>` and the first failure is reported with
//! the offending record index and field path.

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use thiserror::Error;

use super::SourceKind;

/// A source batch failed structural validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The batch itself is malformed (not an array)
    #[error("{}: {reason}", .kind.label())]
    Batch { kind: SourceKind, reason: String },

    /// A record is malformed as a whole (not an object, or missing a field)
    #[error("{}: record {index}: {reason}", .kind.label())]
    Record {
        kind: SourceKind,
        index: usize,
        reason: String,
    },

    /// A field inside a record, e.g. `macros.protein_g` or `nutrients[1].value`
    #[error("{}: record {index}: {path}: {reason}", .kind.label())]
    Field {
        kind: SourceKind,
        index: usize,
        path: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn kind(&self) -> SourceKind {
        match self {
            ValidationError::Batch { kind, .. }
            | ValidationError::Record { kind, .. }
            | ValidationError::Field { kind, .. } => *kind,
        }
    }

    /// Index of the offending record; None when the batch itself is malformed
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::Batch { .. } => None,
            ValidationError::Record { index, .. } | ValidationError::Field { index, .. } => Some(*index),
        }
    }

    /// Field path inside the record; empty for batch and record errors
    pub fn path(&self) -> &str {
        match self {
            ValidationError::Field { path, .. } => path,
            _ => "",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ValidationError::Batch { reason, .. }
            | ValidationError::Record { reason, .. }
            | ValidationError::Field { reason, .. } => reason,
        }
    }

    fn from_path_error(kind: SourceKind, err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let reason = err.inner().to_string();
        let mut segments = err.path().iter();

        let index = match segments.next() {
            Some(Segment::Seq { index }) => *index,
            _ => return ValidationError::Batch { kind, reason },
        };

        let mut path = String::new();
        for segment in segments {
            if !path.is_empty() && !matches!(segment, Segment::Seq { .. }) {
                path.push('.');
            }
            path.push_str(&segment.to_string());
        }

        if path.is_empty() {
            ValidationError::Record { kind, index, reason }
        } else {
            ValidationError::Field {
                kind,
                index,
                path,
                reason,
            }
        }
    }
}

/// Deserialize a raw batch into typed records, stopping at the first failure
pub fn validate_batch<T: DeserializeOwned>(kind: SourceKind, raw: &Value) -> Result<Vec<T>, ValidationError> {
    serde_path_to_error::deserialize(raw).map_err(|err| ValidationError::from_path_error(kind, err))
}
