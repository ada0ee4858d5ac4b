//! Search request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Item};

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Rank descending
    #[default]
    Relevance,
    DateDesc,
    DateAsc,
    /// Numeric `rating` descending, unrated items count as 0
    RatingDesc,
    RatingAsc,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::DateDesc => "date_desc",
            Self::DateAsc => "date_asc",
            Self::RatingDesc => "rating_desc",
            Self::RatingAsc => "rating_asc",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "date_desc" => Ok(Self::DateDesc),
            "date_asc" => Ok(Self::DateAsc),
            "rating_desc" => Ok(Self::RatingDesc),
            "rating_asc" => Ok(Self::RatingAsc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filters applied to one search call
///
/// `category_ids` and the date bounds narrow retrieval; rating, status and
/// tags are applied after matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
    /// Inclusive lower bound on `created_at`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl SearchFilters {
    pub fn has_rating_bounds(&self) -> bool {
        self.rating_min.is_some() || self.rating_max.is_some()
    }

    /// Status filter, if set to something non-empty
    pub fn status_filter(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    /// Tags filter, if set to a non-empty list
    pub fn tags_filter(&self) -> Option<&[String]> {
        self.tags.as_deref().filter(|t| !t.is_empty())
    }
}

/// One matched item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub item: Item,
    pub category: Category,
    /// Data keys whose value contained a query token, in discovery order
    ///
    /// Values are compared through [`value_text`](crate::models::value_text),
    /// so keys holding null or an object never appear here.
    pub matched_fields: Vec<String>,
    /// Always at least 1
    pub rank: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total_count: usize,
    pub query: String,
    pub filters: SearchFilters,
}

impl SearchResponse {
    pub fn empty(query: &str, filters: SearchFilters) -> Self {
        Self {
            results: vec![],
            total_count: 0,
            query: query.to_string(),
            filters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// Taken from the recent-search history
    Recent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
}

impl Suggestion {
    pub fn recent(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suggestion_type: SuggestionType::Recent,
            category_id: None,
            item_id: None,
        }
    }
}
