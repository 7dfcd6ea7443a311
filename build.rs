//! Build script for UNC
//!
//! Embeds the build timestamp and a fingerprint of the source schema modules,
//! so a running server can report which record schemas it validates against.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};

/// Modules whose serde derives define the accepted record shapes
const SCHEMA_FILES: [&str; 5] = [
    "src/sources/common.rs",
    "src/sources/source_a.rs",
    "src/sources/source_b.rs",
    "src/sources/source_c.rs",
    "src/sources/source_d.rs",
];

fn main() {
    println!("cargo:rerun-if-changed=src");

    let mut hasher = DefaultHasher::new();
    for file in SCHEMA_FILES {
        let contents = fs::read_to_string(file).unwrap_or_default();
        file.hash(&mut hasher);
        contents.hash(&mut hasher);
    }
    let fingerprint = format!("{:016x}", hasher.finish());

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=UNC_SCHEMA_FINGERPRINT={}", fingerprint);
    println!("cargo:rustc-env=UNC_BUILD_TIMESTAMP={}", timestamp);
}
