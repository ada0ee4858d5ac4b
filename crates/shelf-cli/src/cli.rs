//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shelf - Track books, manga, anime, movies and anything else
#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Personal media tracker with search and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to [database] path in shelf.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Owner to act as (defaults to SHELF_USER or [user] owner in shelf.toml)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for real data)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SHELF_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and install category templates
    Init,

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage items in a category
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },

    /// Search across your categories
    Search {
        /// Search terms (matched case-insensitively against item data)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Restrict to a category (ID or name, repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Created on or after this day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Created on or before this day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Minimum rating (excludes unrated items)
        #[arg(long)]
        rating_min: Option<f64>,

        /// Maximum rating (excludes unrated items)
        #[arg(long)]
        rating_max: Option<f64>,

        /// Require one of these tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Exact status value, e.g. "Completed"
        #[arg(long)]
        status: Option<String>,

        /// Sort order: relevance, date_desc, date_asc, rating_desc, rating_asc
        #[arg(short, long, default_value = "relevance")]
        sort: String,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest queries from recent searches
    Suggest {
        /// Partial query
        #[arg(default_value = "")]
        query: String,
    },

    /// Show recent searches
    History {
        /// Clear the recent-search history
        #[arg(long)]
        clear: bool,
    },

    /// Show statistics, activity and insights
    Analytics {
        /// Period: 7d, 30d, 90d, 1y, all (defaults to [analytics] in shelf.toml)
        #[arg(short, long)]
        period: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on (defaults to [server] port in shelf.toml)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to [server] host in shelf.toml)
        #[arg(long)]
        host: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List your categories
    List,

    /// List built-in templates
    Templates,

    /// Create a category from a template
    Clone {
        /// Template ID or name
        template: String,

        /// Name for the new category (defaults to the template's)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Create an empty category
    Add {
        /// Category name
        name: String,

        /// Icon (emoji)
        #[arg(long)]
        icon: Option<String>,

        /// Color (hex, e.g. "#3b82f6")
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category and all its items
    Delete {
        /// Category ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ItemsAction {
    /// List items in a category
    List {
        /// Category ID or name
        category: String,
    },

    /// Add an item to a category
    Add {
        /// Category ID or name
        category: String,

        /// Item data as a JSON object, e.g. '{"title": "Dune", "rating": 5}'
        #[arg(short, long)]
        data: String,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: i64,
    },
}
