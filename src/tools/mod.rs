//! UNC Tools module
//!
//! MCP tool implementations for the Unreliable Nutrition Contract service.

pub mod entries;
pub mod status;
