//! Domain models for Shelf

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field types supported by custom categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single line text input
    #[default]
    Text,
    /// Multi-line text input
    Textarea,
    Number,
    Date,
    Boolean,
    Url,
    /// Single select dropdown
    Select,
    /// Multiple select dropdown
    Multiselect,
    /// Freeform text tags
    Tags,
    /// Star rating (1-5 unless configured otherwise)
    Rating,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Url => "url",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Tags => "tags",
            Self::Rating => "rating",
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "textarea" => Ok(Self::Textarea),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "boolean" => Ok(Self::Boolean),
            "url" => Ok(Self::Url),
            "select" => Ok(Self::Select),
            "multiselect" => Ok(Self::Multiselect),
            "tags" => Ok(Self::Tags),
            "rating" => Ok(Self::Rating),
            _ => Err(format!("Unknown field type: {}", s)),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field definition within a category schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryField {
    pub id: i64,
    pub category_id: i64,
    /// Internal field name (snake_case), the key used in item data
    pub name: String,
    /// Human readable label
    pub label: String,
    pub field_type: FieldType,
    pub placeholder: Option<String>,
    /// select/multiselect: list of choices, rating: {"max": n}
    pub options: Option<Value>,
    pub required: bool,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategoryField {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub required: bool,
    pub order_index: i64,
}

impl NewCategoryField {
    pub fn new(name: &str, label: &str, field_type: FieldType, order_index: i64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            placeholder: None,
            options: None,
            required: false,
            order_index,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// Partial update for a field; unset members keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFieldUpdate {
    pub name: Option<String>,
    pub label: Option<String>,
    pub field_type: Option<FieldType>,
    pub placeholder: Option<String>,
    pub options: Option<Value>,
    pub required: Option<bool>,
    pub order_index: Option<i64>,
}

/// A collection of tracked items with its own dynamic schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    /// System-provided template (shared, cloned into owned categories)
    pub is_template: bool,
    /// Ordered by `order_index`, ties by insertion
    #[serde(default)]
    pub fields: Vec<CategoryField>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<NewCategoryField>,
}

/// Partial update for a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

/// External API an item's data was auto-filled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiSource {
    GoogleBooks,
}

impl ApiSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleBooks => "google_books",
        }
    }
}

impl std::str::FromStr for ApiSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "google_books" => Ok(Self::GoogleBooks),
            _ => Err(format!("Unknown API source: {}", s)),
        }
    }
}

/// Schemaless key/value payload of an item
///
/// Values are plain JSON. Every accessor checks presence and type explicitly;
/// a missing or wrongly typed value reads as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemData(Map<String, Value>);

impl ItemData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse stored JSON. Anything that is not an object becomes empty data.
    pub fn from_json_str(s: &str) -> Self {
        match serde_json::from_str::<Value>(s) {
            Ok(value) => Self::from(value),
            Err(_) => Self::default(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric value, if the key holds a JSON number
    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// String value, if the key holds a JSON string
    pub fn string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Array value, if the key holds a JSON array
    pub fn array(&self, key: &str) -> Option<&Vec<Value>> {
        self.0.get(key).and_then(Value::as_array)
    }

    /// Searchable text of a field (see [`value_text`])
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(value_text)
    }

    /// Lowercase JSON rendering of the whole payload, keys included
    pub fn search_blob(&self) -> String {
        serde_json::to_string(&self.0)
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Value> for ItemData {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl From<Map<String, Value>> for ItemData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Text form of a JSON value used for field-level matching
///
/// Strings as-is, numbers and booleans in display form, arrays as their
/// elements' text joined by `,`. Null and nested objects have no text.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(values) => Some(
            values
                .iter()
                .map(|v| value_text(v).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Null | Value::Object(_) => None,
    }
}

/// A single tracked entry within a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub category_id: i64,
    pub owner: String,
    pub data: ItemData,
    pub cover_image_url: Option<String>,
    /// Storage path when the cover was uploaded rather than linked
    pub cover_image_path: Option<String>,
    pub api_source: Option<ApiSource>,
    pub api_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewItem {
    pub data: ItemData,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub cover_image_path: Option<String>,
    #[serde(default)]
    pub api_source: Option<ApiSource>,
    #[serde(default)]
    pub api_id: Option<String>,
}

impl NewItem {
    pub fn from_data(data: ItemData) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_data_typed_accessors() {
        let data = ItemData::from(json!({
            "title": "Dune",
            "rating": 5,
            "status": 3,
            "tags": ["scifi", 7],
            "notes": null
        }));

        assert_eq!(data.string("title"), Some("Dune"));
        assert_eq!(data.number("rating"), Some(5.0));
        // Wrong type reads as absent
        assert_eq!(data.string("status"), None);
        assert_eq!(data.number("title"), None);
        assert_eq!(data.array("tags").map(Vec::len), Some(2));
        assert_eq!(data.text("notes"), None);
        assert_eq!(data.text("missing"), None);
    }

    #[test]
    fn test_item_data_from_non_object() {
        assert!(ItemData::from_json_str("[1, 2, 3]").is_empty());
        assert!(ItemData::from_json_str("not json").is_empty());
        assert_eq!(ItemData::from_json_str(r#"{"a": 1}"#).len(), 1);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("Dune")), Some("Dune".to_string()));
        assert_eq!(value_text(&json!(4.5)), Some("4.5".to_string()));
        assert_eq!(value_text(&json!(true)), Some("true".to_string()));
        assert_eq!(
            value_text(&json!(["a", 1, null])),
            Some("a,1,".to_string())
        );
        assert_eq!(value_text(&json!({"nested": "x"})), None);
    }

    #[test]
    fn test_search_blob_is_lowercase_json() {
        let data = ItemData::new().with("Title", "Dune MESSIAH");
        assert_eq!(data.search_blob(), r#"{"title":"dune messiah"}"#);
    }

    #[test]
    fn test_field_type_parse_roundtrip() {
        for ft in [FieldType::Text, FieldType::Rating, FieldType::Multiselect] {
            assert_eq!(ft.as_str().parse::<FieldType>().unwrap(), ft);
        }
        assert!("bogus".parse::<FieldType>().is_err());
    }
}
