//! Test utilities for shelf-core
//!
//! An in-memory [`DataGateway`] with call counting and failure injection,
//! plus builders for categories and items.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::gateway::DataGateway;
use crate::models::{Category, Item, ItemData};

/// Fixed creation time used by [`item`]
pub fn default_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Owned, non-template category without fields
pub fn category(id: i64, name: &str) -> Category {
    let at = default_created_at();
    Category {
        id,
        owner: "tester".to_string(),
        name: name.to_string(),
        icon: None,
        color: None,
        description: None,
        is_template: false,
        fields: vec![],
        created_at: at,
        updated_at: at,
    }
}

/// Item with JSON data, created at [`default_created_at`]
pub fn item(id: i64, category_id: i64, data: Value) -> Item {
    item_at(id, category_id, data, default_created_at())
}

pub fn item_at(id: i64, category_id: i64, data: Value, created_at: DateTime<Utc>) -> Item {
    Item {
        id,
        category_id,
        owner: "tester".to_string(),
        data: ItemData::from(data),
        cover_image_url: None,
        cover_image_path: None,
        api_source: None,
        api_id: None,
        created_at,
        updated_at: created_at,
    }
}

/// Gateway over fixed vectors, returning items in insertion order
#[derive(Default)]
pub struct MemoryGateway {
    categories: Vec<Category>,
    items: Vec<Item>,
    fail: bool,
    calls: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Make every call return [`Error::Gateway`]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of gateway calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Gateway("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn list_owned_categories(&self) -> Result<Vec<Category>> {
        self.enter()?;
        Ok(self.categories.clone())
    }

    async fn list_items(&self, category_id: i64) -> Result<Vec<Item>> {
        self.enter()?;
        Ok(self
            .items
            .iter()
            .filter(|i| i.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn list_items_in(
        &self,
        category_ids: &[i64],
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Item>> {
        self.enter()?;
        Ok(self
            .items
            .iter()
            .filter(|i| category_ids.contains(&i.category_id))
            .filter(|i| date_from.map_or(true, |from| i.created_at >= from))
            .filter(|i| date_to.map_or(true, |to| i.created_at <= to))
            .cloned()
            .collect())
    }
}
