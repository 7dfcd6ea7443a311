//! Build information module
//!
//! Package version, compile time, and the schema fingerprint computed by
//! `build.rs` over the source record modules. Two binaries with the same
//! fingerprint accept exactly the same source batches.

use serde::Serialize;

use crate::sources::SourceKind;

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("UNC_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Hash of the source schema modules, 16 hex digits
pub const SCHEMA_FINGERPRINT: &str = match option_env!("UNC_SCHEMA_FINGERPRINT") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub schema_fingerprint: &'static str,
    /// Keys of the sources this build can normalize
    pub sources: Vec<&'static str>,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_timestamp: BUILD_TIMESTAMP,
            schema_fingerprint: SCHEMA_FINGERPRINT,
            sources: SourceKind::ALL.iter().map(|kind| kind.key()).collect(),
        }
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  Unreliable Nutrition Contract (UNC)");
    eprintln!("  Version: {} | Schemas: {}", info.version, info.schema_fingerprint);
    eprintln!("  Sources: {}", info.sources.join(", "));
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("===============================================");
}
