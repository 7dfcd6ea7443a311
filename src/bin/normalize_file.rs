//! Utility to normalize a saved source batch and print the entries

use std::path::PathBuf;

use unc::sources::{process_source, SourceKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(key), Some(path)) = (args.next(), args.next()) else {
        eprintln!("Usage: normalize_file <source-key> <path>");
        eprintln!("  source-key: a, b, c, or d");
        std::process::exit(2);
    };

    let kind = SourceKind::from_key(&key)
        .ok_or_else(|| format!("Unknown source '{}'. Valid sources: a, b, c, d", key))?;
    let path = PathBuf::from(path);
    eprintln!("Reading {} from {}", kind.label(), path.display());

    let contents = std::fs::read_to_string(&path)?;
    let raw: serde_json::Value = serde_json::from_str(&contents)?;
    let entries = process_source(kind, &raw)?;

    let flagged = entries.iter().filter(|e| e.has_issues()).count();
    eprintln!("Normalized {} entries ({} with issues)", entries.len(), flagged);

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
