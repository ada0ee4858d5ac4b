//! Category item operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database, ItemFilter};
use crate::error::{Error, Result};
use crate::models::{Item, ItemData, NewItem};

const ITEM_COLUMNS: &str = "i.id, i.category_id, i.owner, i.data, i.cover_image_url, i.cover_image_path, i.api_source, i.api_id, i.created_at, i.updated_at";

fn row_to_item(row: &Row) -> rusqlite::Result<Item> {
    let data: String = row.get(3)?;
    let api_source: Option<String> = row.get(6)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;
    Ok(Item {
        id: row.get(0)?,
        category_id: row.get(1)?,
        owner: row.get(2)?,
        data: ItemData::from_json_str(&data),
        cover_image_url: row.get(4)?,
        cover_image_path: row.get(5)?,
        api_source: api_source.and_then(|s| s.parse().ok()),
        api_id: row.get(7)?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

impl Database {
    /// Create an item in a category, timestamped now
    pub fn create_item(&self, owner: &str, category_id: i64, input: &NewItem) -> Result<Item> {
        self.create_item_at(owner, category_id, input, Utc::now())
    }

    /// Create an item with an explicit creation time (imports and backfills)
    pub fn create_item_at(
        &self,
        owner: &str,
        category_id: i64,
        input: &NewItem,
        created_at: DateTime<Utc>,
    ) -> Result<Item> {
        let conn = self.conn()?;

        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE id = ?",
                params![category_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("category {}", category_id)));
        }

        let data = serde_json::to_string(&input.data)?;
        let timestamp = format_datetime(&created_at);
        conn.execute(
            "INSERT INTO category_items (category_id, owner, data, cover_image_url, cover_image_path, api_source, api_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                category_id,
                owner,
                data,
                input.cover_image_url,
                input.cover_image_path,
                input.api_source.map(|s| s.as_str()),
                input.api_id,
                timestamp,
                timestamp
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_item(id)?
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))
    }

    /// Get a single item by ID
    pub fn get_item(&self, id: i64) -> Result<Option<Item>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!("SELECT {} FROM category_items i WHERE i.id = ?", ITEM_COLUMNS),
                params![id],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    /// List all items of a category, newest first
    pub fn list_items(&self, category_id: i64) -> Result<Vec<Item>> {
        let ids = [category_id];
        self.list_items_filtered(ItemFilter::new().category_ids(Some(&ids)))
    }

    /// List items matching a filter
    pub fn list_items_filtered(&self, filter: ItemFilter<'_>) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let result = filter.build();
        let sql = format!(
            "SELECT {} FROM category_items i {} {}",
            ITEM_COLUMNS, result.where_clause, result.order_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(result.params_refs().as_slice(), row_to_item)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Count items matching a filter
    pub fn count_items_filtered(&self, filter: ItemFilter<'_>) -> Result<i64> {
        let conn = self.conn()?;
        let result = filter.build();
        let count = conn.query_row(
            &result.build_count_query(),
            result.params_refs().as_slice(),
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Replace an item's payload and cover/API metadata
    pub fn update_item(&self, id: i64, input: &NewItem) -> Result<Item> {
        let conn = self.conn()?;
        let data = serde_json::to_string(&input.data)?;
        let changed = conn.execute(
            "UPDATE category_items SET
                data = ?, cover_image_url = ?, cover_image_path = ?, api_source = ?, api_id = ?, updated_at = ?
             WHERE id = ?",
            params![
                data,
                input.cover_image_url,
                input.cover_image_path,
                input.api_source.map(|s| s.as_str()),
                input.api_id,
                format_datetime(&Utc::now()),
                id
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Err(Error::NotFound(format!("item {}", id)));
        }
        self.get_item(id)?
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))
    }

    /// Delete an item
    pub fn delete_item(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM category_items WHERE id = ?", params![id])?;
        Ok(())
    }
}
