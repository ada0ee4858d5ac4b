//! Item command implementations

use anyhow::{Context, Result};
use shelf_core::db::Database;
use shelf_core::models::{Item, ItemData, NewItem};

use super::{resolve_category, truncate};

/// One-line label for an item: the first title-like field, else its ID
pub fn item_label(item: &Item) -> String {
    ["title", "name", "item_name"]
        .iter()
        .find_map(|key| item.data.text(key).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| format!("item #{}", item.id))
}

pub fn cmd_items_list(db: &Database, owner: &str, category: &str) -> Result<()> {
    let category = resolve_category(db, owner, category)?;
    let items = db.list_items(category.id)?;

    if items.is_empty() {
        println!("No items in '{}' yet.", category.name);
        return Ok(());
    }

    println!();
    println!(
        "{} {} ({} items)",
        category.icon.as_deref().unwrap_or("📁"),
        category.name,
        items.len()
    );
    println!("   ─────────────────────────────────────────────────────────────");
    for item in &items {
        let rating = item
            .data
            .number("rating")
            .map(|r| format!("★ {}", r))
            .unwrap_or_default();
        println!(
            "   {:>5}  {:<40} {:<8} {}",
            item.id,
            truncate(&item_label(item), 40),
            rating,
            item.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_items_add(db: &Database, owner: &str, category: &str, data: &str) -> Result<Item> {
    let category = resolve_category(db, owner, category)?;

    let value: serde_json::Value =
        serde_json::from_str(data).context("--data must be valid JSON")?;
    if !value.is_object() {
        anyhow::bail!("--data must be a JSON object, e.g. '{{\"title\": \"Dune\"}}'");
    }

    let item = db.create_item(owner, category.id, &NewItem::from_data(ItemData::from(value)))?;
    println!(
        "✅ Added '{}' to {} (id: {})",
        item_label(&item),
        category.name,
        item.id
    );

    Ok(item)
}

pub fn cmd_items_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    let item = db
        .get_item(id)?
        .filter(|i| i.owner == owner)
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    db.delete_item(id)?;
    println!("🗑️  Deleted '{}'", item_label(&item));

    Ok(())
}
