//! Matching, scoring and ordering of search candidates

use std::cmp::Ordering;

use serde_json::Value;

use super::types::{SearchFilters, SearchResult, SortBy};
use crate::models::{value_text, Item, ItemData};

/// Fields whose match earns the title boost
pub const TITLE_FIELDS: [&str; 3] = ["title", "name", "item_name"];

/// Rank added per matching title-like field
pub const TITLE_BOOST: u32 = 2;

/// Lowercased whitespace tokens, duplicates collapsed, first occurrence order
pub fn tokenize(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in query.split_whitespace().map(str::to_lowercase) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Score of one item against the query tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub rank: u32,
    pub matched_fields: Vec<String>,
}

/// Score an item's data, or `None` when no token occurs in it
pub fn score_item(data: &ItemData, tokens: &[String]) -> Option<Score> {
    let blob = data.search_blob();
    let found: Vec<&String> = tokens.iter().filter(|t| blob.contains(t.as_str())).collect();
    if found.is_empty() {
        return None;
    }

    let mut matched_fields: Vec<String> = Vec::new();
    for token in &found {
        for (key, value) in data.iter() {
            let Some(text) = value_text(value) else {
                continue;
            };
            if text.to_lowercase().contains(token.as_str()) && !matched_fields.contains(key) {
                matched_fields.push(key.clone());
            }
        }
    }

    let mut rank = found.len() as u32;
    for field in TITLE_FIELDS {
        let Some(text) = data.text(field).filter(|t| !t.is_empty()) else {
            continue;
        };
        let text = text.to_lowercase();
        if tokens.iter().any(|t| text.contains(t.as_str())) {
            rank += TITLE_BOOST;
        }
    }

    Some(Score {
        rank,
        matched_fields,
    })
}

/// Post-match filters: rating range, status, tags
pub fn passes_filters(item: &Item, filters: &SearchFilters) -> bool {
    if filters.has_rating_bounds() {
        let Some(rating) = item.data.number("rating") else {
            return false;
        };
        if filters.rating_min.is_some_and(|min| rating < min) {
            return false;
        }
        if filters.rating_max.is_some_and(|max| rating > max) {
            return false;
        }
    }

    if let Some(status) = filters.status_filter() {
        if item.data.string("status") != Some(status) {
            return false;
        }
    }

    if let Some(wanted) = filters.tags_filter() {
        let Some(tags) = item.data.array("tags") else {
            return false;
        };
        let has_tag = wanted
            .iter()
            .any(|w| tags.iter().any(|t| matches!(t, Value::String(s) if s == w)));
        if !has_tag {
            return false;
        }
    }

    true
}

fn rating_or_zero(result: &SearchResult) -> f64 {
    result.item.data.number("rating").unwrap_or(0.0)
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Stable sort; ties keep retrieval order
pub fn sort_results(results: &mut [SearchResult], sort_by: SortBy) {
    match sort_by {
        SortBy::Relevance => results.sort_by(|a, b| b.rank.cmp(&a.rank)),
        SortBy::DateDesc => results.sort_by(|a, b| b.item.created_at.cmp(&a.item.created_at)),
        SortBy::DateAsc => results.sort_by(|a, b| a.item.created_at.cmp(&b.item.created_at)),
        SortBy::RatingDesc => {
            results.sort_by(|a, b| cmp_f64(rating_or_zero(b), rating_or_zero(a)))
        }
        SortBy::RatingAsc => {
            results.sort_by(|a, b| cmp_f64(rating_or_zero(a), rating_or_zero(b)))
        }
    }
}
