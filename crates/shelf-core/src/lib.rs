//! Shelf Core Library
//!
//! Shared functionality for the Shelf media tracker:
//! - Database access, migrations and built-in category templates
//! - Data gateway consumed by the engines
//! - Search engine with ranking, filters and recent-search history
//! - Analytics engine (stats, time series, distributions, insights)
//! - Configuration with embedded defaults

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod history;
pub mod models;
pub mod search;

/// Test utilities including an in-memory gateway
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{AnalyticsData, AnalyticsEngine, Clock, Insight, Period};
pub use config::ShelfConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use gateway::{DataGateway, DatabaseGateway};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore, NoHistory};
pub use models::{Category, Item, ItemData, NewCategory, NewItem};
pub use search::{SearchEngine, SearchFilters, SearchResponse, SearchResult, SortBy, Suggestion};
