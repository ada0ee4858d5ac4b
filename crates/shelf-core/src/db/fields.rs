//! Category field schema operations

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{CategoryField, CategoryFieldUpdate, FieldType, NewCategoryField};

const FIELD_COLUMNS: &str =
    "id, category_id, name, label, field_type, placeholder, options, required, order_index, created_at";

fn row_to_field(row: &Row) -> rusqlite::Result<CategoryField> {
    let field_type: String = row.get(4)?;
    let options: Option<String> = row.get(6)?;
    let created_at: String = row.get(9)?;
    Ok(CategoryField {
        id: row.get(0)?,
        category_id: row.get(1)?,
        name: row.get(2)?,
        label: row.get(3)?,
        field_type: field_type.parse().unwrap_or(FieldType::Text),
        placeholder: row.get(5)?,
        options: options.and_then(|s| serde_json::from_str(&s).ok()),
        required: row.get(7)?,
        order_index: row.get(8)?,
        created_at: parse_datetime(&created_at),
    })
}

/// Load a category's fields in render order (order_index, then insertion)
pub(super) fn load_fields(conn: &Connection, category_id: i64) -> Result<Vec<CategoryField>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM category_fields WHERE category_id = ? ORDER BY order_index ASC, id ASC",
        FIELD_COLUMNS
    ))?;

    let fields = stmt
        .query_map(params![category_id], row_to_field)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(fields)
}

pub(super) fn insert_field(
    conn: &Connection,
    category_id: i64,
    field: &NewCategoryField,
    now: &str,
) -> Result<i64> {
    if field.name.trim().is_empty() {
        return Err(Error::InvalidData("Field name is required".to_string()));
    }

    let options = field
        .options
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    conn.execute(
        "INSERT INTO category_fields (category_id, name, label, field_type, placeholder, options, required, order_index, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            category_id,
            field.name.trim(),
            field.label,
            field.field_type.as_str(),
            field.placeholder,
            options,
            field.required,
            field.order_index,
            now
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

impl Database {
    /// Fields of a category in render order
    pub fn get_fields_for_category(&self, category_id: i64) -> Result<Vec<CategoryField>> {
        let conn = self.conn()?;
        load_fields(&conn, category_id)
    }

    pub fn get_field(&self, id: i64) -> Result<Option<CategoryField>> {
        let conn = self.conn()?;
        let field = conn
            .query_row(
                &format!("SELECT {} FROM category_fields WHERE id = ?", FIELD_COLUMNS),
                params![id],
                row_to_field,
            )
            .optional()?;
        Ok(field)
    }

    /// Add a field to an existing category
    ///
    /// Field names are item data keys, so they must be unique per category.
    pub fn create_field(&self, category_id: i64, field: &NewCategoryField) -> Result<CategoryField> {
        let conn = self.conn()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)",
            params![category_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(Error::NotFound(format!("category {}", category_id)));
        }

        let taken: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM category_fields WHERE category_id = ? AND name = ?)",
            params![category_id, field.name.trim()],
            |row| row.get(0),
        )?;
        if taken {
            return Err(Error::InvalidData(format!(
                "Field '{}' already exists in this category",
                field.name.trim()
            )));
        }

        let id = insert_field(&conn, category_id, field, &format_datetime(&Utc::now()))?;
        drop(conn);

        self.get_field(id)?
            .ok_or_else(|| Error::NotFound(format!("field {}", id)))
    }

    /// Apply a partial update to a field
    pub fn update_field(&self, id: i64, update: &CategoryFieldUpdate) -> Result<CategoryField> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(Error::InvalidData("Field name is required".to_string()));
        }

        let options = update
            .options
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE category_fields SET
                name = COALESCE(?, name),
                label = COALESCE(?, label),
                field_type = COALESCE(?, field_type),
                placeholder = COALESCE(?, placeholder),
                options = COALESCE(?, options),
                required = COALESCE(?, required),
                order_index = COALESCE(?, order_index)
             WHERE id = ?",
            params![
                update.name.as_deref().map(str::trim),
                update.label,
                update.field_type.map(|t| t.as_str()),
                update.placeholder,
                options,
                update.required,
                update.order_index,
                id
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Err(Error::NotFound(format!("field {}", id)));
        }
        self.get_field(id)?
            .ok_or_else(|| Error::NotFound(format!("field {}", id)))
    }

    /// Remove a field from its category's schema
    ///
    /// Item data under the field's key is left in place.
    pub fn delete_field(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM category_fields WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Rewrite `order_index` as 1..n following `field_ids`
    ///
    /// Every id must belong to `category_id`; otherwise nothing is changed.
    pub fn reorder_fields(&self, category_id: i64, field_ids: &[i64]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for (index, field_id) in field_ids.iter().enumerate() {
            let changed = tx.execute(
                "UPDATE category_fields SET order_index = ? WHERE id = ? AND category_id = ?",
                params![index as i64 + 1, field_id, category_id],
            )?;
            if changed == 0 {
                return Err(Error::InvalidData(format!(
                    "Field {} does not belong to category {}",
                    field_id, category_id
                )));
            }
        }

        tx.commit()?;
        Ok(())
    }
}
