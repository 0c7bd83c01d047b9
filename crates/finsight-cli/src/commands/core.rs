//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Shared utility to resolve the analytics config
//! - `cmd_init` - Initialize the database
//! - `cmd_users` / `cmd_purge` - Stored user housekeeping
//! - `cmd_categories` - List the category set

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::config::default_config_path;
use finsight_core::insights::guidelines::guideline_percentage;
use finsight_core::models::Category;
use finsight_core::{AnalyticsConfig, Database};

/// Open (or create) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path.to_string_lossy();
    Database::new(&path_str)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

/// Load the analytics config (explicit path, data-dir override, defaults)
pub fn load_config(config_path: Option<&Path>) -> Result<AnalyticsConfig> {
    AnalyticsConfig::load(config_path).context("Failed to load analytics config")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    if let Some(path) = default_config_path() {
        println!("   Config override: {}", path.display());
    }

    println!("✅ Database initialized successfully at {}", db.path());
    println!();
    println!("Next steps:");
    println!("  1. Import transactions: finsight import --file transactions.csv --user me");
    println!("  2. View insights: finsight insights --user me");
    println!("  3. Start API server: finsight serve");

    Ok(())
}

pub fn cmd_users(db: &Database) -> Result<()> {
    let users = db.list_users().context("Failed to list users")?;

    if users.is_empty() {
        println!("No stored transactions yet. Run 'finsight import' first.");
        return Ok(());
    }

    println!();
    println!("👥 Users");
    println!("   {:30} │ {:>12}", "User", "Transactions");
    println!("   ───────────────────────────────┼──────────────");
    for user in &users {
        println!(
            "   {:30} │ {:>12}",
            super::truncate(&user.user_id, 30),
            user.transaction_count
        );
    }

    Ok(())
}

pub fn cmd_purge(db: &Database, user_id: &str) -> Result<()> {
    let deleted = db
        .delete_user_transactions(user_id)
        .with_context(|| format!("Failed to delete transactions for {}", user_id))?;

    if deleted == 0 {
        println!("No stored transactions for {}", user_id);
    } else {
        println!("🗑️  Deleted {} transaction(s) for {}", deleted, user_id);
    }

    Ok(())
}

pub fn cmd_categories() -> Result<()> {
    println!();
    println!("🏷️  Categories");
    println!("   {:15} │ {:>10}", "Category", "Guideline");
    println!("   ────────────────┼───────────");
    for category in Category::all() {
        println!(
            "   {:15} │ {:>9}%",
            category.as_str(),
            guideline_percentage(*category)
        );
    }
    println!();
    println!("   Any other category name is counted as 'other'.");

    Ok(())
}
