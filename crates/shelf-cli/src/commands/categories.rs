//! Category command implementations

use anyhow::{Context, Result};
use shelf_core::db::Database;
use shelf_core::models::{Category, NewCategory};

fn print_category(db: &Database, category: &Category) -> Result<()> {
    let count = db.category_item_count(category.id)?;
    let icon = category.icon.as_deref().unwrap_or("📁");
    let fields: Vec<&str> = category.fields.iter().map(|f| f.name.as_str()).collect();
    println!(
        "   {:>4}  {} {:<20} {:>5} items   {}",
        category.id,
        icon,
        category.name,
        count,
        fields.join(", ")
    );
    Ok(())
}

pub fn cmd_categories_list(db: &Database, owner: &str) -> Result<()> {
    let categories = db.list_owned_categories(owner)?;

    if categories.is_empty() {
        println!("No categories yet. Run 'shelf categories templates' to see what you can clone.");
        return Ok(());
    }

    println!();
    println!("🗂️  Categories ({})", owner);
    println!("   ─────────────────────────────────────────────────────────────");
    for category in &categories {
        print_category(db, category)?;
    }

    Ok(())
}

pub fn cmd_categories_templates(db: &Database) -> Result<()> {
    let templates = db.list_templates()?;

    if templates.is_empty() {
        println!("No templates installed. Run 'shelf init' first.");
        return Ok(());
    }

    println!();
    println!("📋 Templates");
    println!("   ─────────────────────────────────────────────────────────────");
    for template in &templates {
        let fields: Vec<String> = template
            .fields
            .iter()
            .map(|f| format!("{} ({})", f.name, f.field_type))
            .collect();
        println!(
            "   {:>4}  {} {:<10} {}",
            template.id,
            template.icon.as_deref().unwrap_or("📁"),
            template.name,
            fields.join(", ")
        );
    }

    Ok(())
}

/// Clone a template (by ID or name) into an owned category
pub fn cmd_categories_clone(
    db: &Database,
    owner: &str,
    template: &str,
    name: Option<&str>,
) -> Result<Category> {
    let templates = db.list_templates()?;
    let source = templates
        .iter()
        .find(|t| t.id.to_string() == template || t.name.eq_ignore_ascii_case(template))
        .ok_or_else(|| anyhow::anyhow!("Template not found: {}", template))?;

    let category = db
        .clone_template(owner, source.id, name)
        .context("Failed to clone template")?;
    println!(
        "✅ Created category '{}' (id: {}) from template '{}'",
        category.name, category.id, source.name
    );

    Ok(category)
}

pub fn cmd_categories_add(
    db: &Database,
    owner: &str,
    name: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<Category> {
    let category = db.create_category(
        owner,
        &NewCategory {
            name: name.to_string(),
            icon: icon.map(str::to_string),
            color: color.map(str::to_string),
            ..Default::default()
        },
    )?;
    println!("✅ Created category '{}' (id: {})", category.name, category.id);

    Ok(category)
}

pub fn cmd_categories_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    let category = db
        .get_category(id)?
        .filter(|c| c.owner == owner && !c.is_template)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", id))?;

    let count = db.category_item_count(id)?;
    db.delete_category(id)?;
    println!(
        "🗑️  Deleted category '{}' and {} item{}",
        category.name,
        count,
        if count == 1 { "" } else { "s" }
    );

    Ok(())
}
