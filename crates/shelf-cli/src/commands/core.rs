//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `history_store` / `search_engine` / `analytics_engine` - engine wiring
//! - `resolve_category` - look up an owned category by ID or name
//! - `cmd_init` - Initialize the database

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use shelf_core::config::ShelfConfig;
use shelf_core::db::Database;
use shelf_core::gateway::DatabaseGateway;
use shelf_core::history::{FileHistoryStore, HistoryStore, NoHistory};
use shelf_core::models::Category;
use shelf_core::{AnalyticsEngine, SearchEngine};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Recent-search history file from config, else the default data-dir file
pub fn history_store(config: &ShelfConfig) -> Arc<dyn HistoryStore> {
    match config
        .history_path
        .clone()
        .or_else(FileHistoryStore::default_path)
    {
        Some(path) => {
            debug!(path = %path.display(), "Using recent-search history file");
            Arc::new(FileHistoryStore::new(path))
        }
        None => Arc::new(NoHistory),
    }
}

pub fn search_engine(db: &Database, owner: &str, history: Arc<dyn HistoryStore>) -> SearchEngine {
    SearchEngine::new(Arc::new(DatabaseGateway::new(db.clone(), owner)), history)
}

pub fn analytics_engine(db: &Database, owner: &str) -> AnalyticsEngine {
    AnalyticsEngine::new(Arc::new(DatabaseGateway::new(db.clone(), owner)))
}

/// Find one of `owner`'s categories by numeric ID or case-insensitive name
pub fn resolve_category(db: &Database, owner: &str, arg: &str) -> Result<Category> {
    let categories = db.list_owned_categories(owner)?;

    if let Ok(id) = arg.parse::<i64>() {
        if let Some(category) = categories.iter().find(|c| c.id == id) {
            return Ok(category.clone());
        }
    }

    categories
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(arg))
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", arg))
}

pub fn cmd_init(db: &Database, db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let seeded = db.seed_templates().context("Failed to seed templates")?;
    if seeded > 0 {
        println!("   Installed {} category templates", seeded);
    } else {
        println!("   Category templates already installed");
    }

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a category: shelf categories clone Books");
    println!("  2. Add an item: shelf items add Books --data '{{\"title\": \"Dune\"}}'");
    println!("  3. Explore: shelf search dune, shelf analytics");

    Ok(())
}
