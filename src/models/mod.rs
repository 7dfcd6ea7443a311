//! Data models
//!
//! The unified entry shape shared by all sources.

mod entry;
mod nutrition;

pub use entry::{Confidence, EntryBase, NutritionEntry, RawRecord, Serving};
pub use nutrition::Macros;
