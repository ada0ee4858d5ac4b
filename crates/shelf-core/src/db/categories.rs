//! Category operations

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::fields::{insert_field, load_fields};
use super::{format_datetime, parse_datetime, Database, ItemFilter};
use crate::error::{Error, Result};
use crate::models::{Category, CategoryUpdate, NewCategory};

const CATEGORY_COLUMNS: &str =
    "id, owner, name, icon, color, description, is_template, created_at, updated_at";

fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;
    Ok(Category {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        icon: row.get(3)?,
        color: row.get(4)?,
        description: row.get(5)?,
        is_template: row.get(6)?,
        fields: vec![],
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

fn with_fields(conn: &Connection, mut categories: Vec<Category>) -> Result<Vec<Category>> {
    for category in &mut categories {
        category.fields = load_fields(conn, category.id)?;
    }
    Ok(categories)
}

impl Database {
    /// Create an owned category together with its field schema
    pub fn create_category(&self, owner: &str, input: &NewCategory) -> Result<Category> {
        let id = self.insert_category(owner, input, false)?;
        self.get_category(id)?
            .ok_or_else(|| Error::NotFound(format!("category {}", id)))
    }

    /// Insert a category row and its fields in one transaction
    pub(crate) fn insert_category(
        &self,
        owner: &str,
        input: &NewCategory,
        is_template: bool,
    ) -> Result<i64> {
        if input.name.trim().is_empty() {
            return Err(Error::InvalidData("Category name is required".to_string()));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let now = format_datetime(&Utc::now());

        tx.execute(
            "INSERT INTO categories (owner, name, icon, color, description, is_template, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                owner,
                input.name.trim(),
                input.icon,
                input.color,
                input.description,
                is_template,
                now,
                now
            ],
        )?;
        let category_id = tx.last_insert_rowid();

        for field in &input.fields {
            insert_field(&tx, category_id, field, &now)?;
        }

        tx.commit()?;
        Ok(category_id)
    }

    /// List system templates that users can clone, by name
    pub fn list_templates(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE is_template = 1 ORDER BY name ASC",
            CATEGORY_COLUMNS
        ))?;
        let categories = stmt
            .query_map([], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        with_fields(&conn, categories)
    }

    /// List an owner's own (non-template) categories, newest first
    pub fn list_owned_categories(&self, owner: &str) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE owner = ? AND is_template = 0 ORDER BY created_at DESC, id DESC",
            CATEGORY_COLUMNS
        ))?;
        let categories = stmt
            .query_map(params![owner], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        with_fields(&conn, categories)
    }

    /// Get a single category with its fields
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE id = ?", CATEGORY_COLUMNS),
                params![id],
                row_to_category,
            )
            .optional()?;

        match category {
            Some(mut category) => {
                category.fields = load_fields(&conn, category.id)?;
                Ok(Some(category))
            }
            None => Ok(None),
        }
    }

    /// Copy a template (metadata and fields) into a new owned category
    pub fn clone_template(
        &self,
        owner: &str,
        template_id: i64,
        custom_name: Option<&str>,
    ) -> Result<Category> {
        let template = self
            .get_category(template_id)?
            .filter(|c| c.is_template)
            .ok_or_else(|| Error::NotFound(format!("template {}", template_id)))?;

        let input = NewCategory {
            name: custom_name
                .filter(|n| !n.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| template.name.clone()),
            icon: template.icon.clone(),
            color: template.color.clone(),
            description: template.description.clone(),
            fields: template
                .fields
                .iter()
                .map(|f| crate::models::NewCategoryField {
                    name: f.name.clone(),
                    label: f.label.clone(),
                    field_type: f.field_type,
                    placeholder: f.placeholder.clone(),
                    options: f.options.clone(),
                    required: f.required,
                    order_index: f.order_index,
                })
                .collect(),
        };

        self.create_category(owner, &input)
    }

    /// Apply a partial update; unset fields keep their current value
    pub fn update_category(&self, id: i64, update: &CategoryUpdate) -> Result<Category> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE categories SET
                name = COALESCE(?, name),
                icon = COALESCE(?, icon),
                color = COALESCE(?, color),
                description = COALESCE(?, description),
                updated_at = ?
             WHERE id = ?",
            params![
                update.name,
                update.icon,
                update.color,
                update.description,
                format_datetime(&Utc::now()),
                id
            ],
        )?;
        drop(conn);

        if changed == 0 {
            return Err(Error::NotFound(format!("category {}", id)));
        }
        self.get_category(id)?
            .ok_or_else(|| Error::NotFound(format!("category {}", id)))
    }

    /// Delete a category with all of its fields and items
    pub fn delete_category(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM category_items WHERE category_id = ?", params![id])?;
        tx.execute("DELETE FROM category_fields WHERE category_id = ?", params![id])?;
        tx.execute("DELETE FROM categories WHERE id = ?", params![id])?;

        tx.commit()?;
        Ok(())
    }

    /// Number of items in a category
    pub fn category_item_count(&self, category_id: i64) -> Result<i64> {
        let ids = [category_id];
        self.count_items_filtered(ItemFilter::new().category_ids(Some(&ids)))
    }
}
