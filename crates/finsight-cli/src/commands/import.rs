//! Import command implementation

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::import::{import_file, ImportFormat};
use finsight_core::{Database, InsertSummary};

/// Parse an optional `--format` value
pub fn parse_format(format: Option<&str>) -> Result<Option<ImportFormat>> {
    format
        .map(|f| f.parse::<ImportFormat>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()
}

pub fn cmd_import(
    db: &Database,
    file: &Path,
    user_id: &str,
    format: Option<&str>,
) -> Result<InsertSummary> {
    let format = parse_format(format)?;

    println!("📥 Importing {} for {}...", file.display(), user_id);

    let parsed = import_file(file, format, user_id)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let summary = db
        .insert_transactions(&parsed.records)
        .context("Failed to store transactions")?;

    println!("✅ Import complete!");
    println!("   Imported: {}", summary.inserted);
    if summary.duplicates > 0 {
        println!("   Skipped (duplicates): {}", summary.duplicates);
    }
    if parsed.skipped > 0 {
        println!("   ⚠️  Skipped (invalid rows): {}", parsed.skipped);
    }

    Ok(summary)
}
