//! Data access gateway consumed by the search and analytics engines
//!
//! The engines never talk to storage directly. They read snapshots through
//! [`DataGateway`], whose errors they propagate without interpretation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::db::{Database, ItemFilter};
use crate::error::Result;
use crate::models::{Category, Item};

/// Read-only access to the caller's categories and items
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// The caller's own (non-template) categories
    async fn list_owned_categories(&self) -> Result<Vec<Category>>;

    /// All items of one category
    async fn list_items(&self, category_id: i64) -> Result<Vec<Item>>;

    /// Items of several categories, optionally bounded by creation time
    /// (both bounds inclusive)
    async fn list_items_in(
        &self,
        category_ids: &[i64],
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Item>>;
}

/// Fetch every item of every given category concurrently
///
/// Fails as a whole if any single fetch fails.
pub async fn fetch_all_items<G>(gateway: &G, categories: &[Category]) -> Result<Vec<Vec<Item>>>
where
    G: DataGateway + ?Sized,
{
    try_join_all(categories.iter().map(|c| gateway.list_items(c.id))).await
}

/// Gateway backed by the local SQLite database, scoped to one owner
#[derive(Clone)]
pub struct DatabaseGateway {
    db: Database,
    owner: String,
}

impl DatabaseGateway {
    pub fn new(db: Database, owner: impl Into<String>) -> Self {
        Self {
            db,
            owner: owner.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DataGateway for DatabaseGateway {
    async fn list_owned_categories(&self) -> Result<Vec<Category>> {
        self.db.list_owned_categories(&self.owner)
    }

    async fn list_items(&self, category_id: i64) -> Result<Vec<Item>> {
        let ids = [category_id];
        self.db.list_items_filtered(
            ItemFilter::new()
                .owner(Some(&self.owner))
                .category_ids(Some(&ids)),
        )
    }

    async fn list_items_in(
        &self,
        category_ids: &[i64],
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Item>> {
        self.db.list_items_filtered(
            ItemFilter::new()
                .owner(Some(&self.owner))
                .category_ids(Some(category_ids))
                .created_from(date_from)
                .created_to(date_to),
        )
    }
}
