//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analytics` - Statistics, activity chart and insights
//! - `categories` - Category listing, templates, clone/add/delete
//! - `core` - Init and shared utilities (open_db, engines, resolve_category)
//! - `items` - Item listing, add and delete
//! - `search` - Search, suggestions and recent-search history
//! - `serve` - Web server command

pub mod analytics;
pub mod categories;
pub mod core;
pub mod items;
pub mod search;
pub mod serve;

// Re-export command functions for main.rs
pub use analytics::*;
pub use categories::*;
pub use core::*;
pub use items::*;
pub use search::*;
pub use serve::*;

/// Truncate a string to at most `max` characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
