//! Built-in category templates

use serde_json::json;
use tracing::info;

use super::Database;
use crate::error::Result;
use crate::models::{FieldType, NewCategory, NewCategoryField};

/// Owner recorded on system templates
pub const TEMPLATE_OWNER: &str = "system";

fn status_field(order_index: i64, choices: &[&str]) -> NewCategoryField {
    NewCategoryField::new("status", "Status", FieldType::Select, order_index)
        .with_options(json!(choices))
}

fn rating_field(order_index: i64) -> NewCategoryField {
    NewCategoryField::new("rating", "Rating", FieldType::Rating, order_index)
        .with_options(json!({ "max": 5 }))
}

fn builtin_templates() -> Vec<NewCategory> {
    vec![
        NewCategory {
            name: "Books".to_string(),
            icon: Some("📚".to_string()),
            color: Some("#f59e0b".to_string()),
            description: Some("Books you have read or want to read".to_string()),
            fields: vec![
                NewCategoryField::new("title", "Title", FieldType::Text, 0).required(),
                NewCategoryField::new("author", "Author", FieldType::Text, 1),
                status_field(2, &["Want to Read", "Reading", "Completed"]),
                rating_field(3),
                NewCategoryField::new("tags", "Tags", FieldType::Tags, 4),
                NewCategoryField::new("date_started", "Date Started", FieldType::Date, 5),
                NewCategoryField::new("date_completed", "Date Completed", FieldType::Date, 6),
                NewCategoryField::new("notes", "Notes", FieldType::Textarea, 7),
            ],
        },
        NewCategory {
            name: "Manga".to_string(),
            icon: Some("📖".to_string()),
            color: Some("#ec4899".to_string()),
            description: Some("Manga series and volumes".to_string()),
            fields: vec![
                NewCategoryField::new("title", "Title", FieldType::Text, 0).required(),
                NewCategoryField::new("chapter", "Chapter", FieldType::Number, 1),
                NewCategoryField::new("volume", "Volume", FieldType::Number, 2),
                status_field(3, &["Plan to Read", "Reading", "Completed"]),
                rating_field(4),
                NewCategoryField::new("link", "Link", FieldType::Url, 5),
                NewCategoryField::new("notes", "Notes", FieldType::Textarea, 6),
            ],
        },
        NewCategory {
            name: "Anime".to_string(),
            icon: Some("🎌".to_string()),
            color: Some("#8b5cf6".to_string()),
            description: Some("Anime series you are watching".to_string()),
            fields: vec![
                NewCategoryField::new("name", "Name", FieldType::Text, 0).required(),
                NewCategoryField::new("season", "Season", FieldType::Number, 1),
                NewCategoryField::new("episode", "Episode", FieldType::Number, 2),
                status_field(3, &["Plan to Watch", "Watching", "Completed"]),
                rating_field(4),
                NewCategoryField::new("link", "Link", FieldType::Url, 5),
                NewCategoryField::new("notes", "Notes", FieldType::Textarea, 6),
            ],
        },
        NewCategory {
            name: "Movies".to_string(),
            icon: Some("🎬".to_string()),
            color: Some("#ef4444".to_string()),
            description: Some("Movies watched and on the watchlist".to_string()),
            fields: vec![
                NewCategoryField::new("title", "Title", FieldType::Text, 0).required(),
                NewCategoryField::new("year", "Year", FieldType::Number, 1),
                NewCategoryField::new("watched", "Watched", FieldType::Boolean, 2),
                rating_field(3),
                NewCategoryField::new("tags", "Tags", FieldType::Tags, 4),
                NewCategoryField::new("notes", "Notes", FieldType::Textarea, 5),
            ],
        },
    ]
}

impl Database {
    /// Install the built-in templates that are not present yet (idempotent)
    pub fn seed_templates(&self) -> Result<usize> {
        let existing: Vec<String> = self
            .list_templates()?
            .into_iter()
            .map(|t| t.name)
            .collect();

        let mut created = 0;
        for template in builtin_templates() {
            if existing.contains(&template.name) {
                continue;
            }
            self.insert_category(TEMPLATE_OWNER, &template, true)?;
            created += 1;
        }

        if created > 0 {
            info!(created, "Seeded category templates");
        }
        Ok(created)
    }
}
