//! Unreliable Nutrition Contract (UNC) Library
//!
//! Validation, normalization and reconciliation of nutrition logs.

pub mod build_info;
pub mod config;
pub mod feed;
pub mod fetch;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod sources;
pub mod tools;
