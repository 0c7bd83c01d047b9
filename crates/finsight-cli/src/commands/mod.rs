//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, users, purge, categories) and shared
//!   utilities (open_db, load_config)
//! - `import` - File import into the store
//! - `analyze` - Insight reports for files and stored users
//! - `serve` - Web server command

pub mod analyze;
pub mod core;
pub mod import;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use import::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
