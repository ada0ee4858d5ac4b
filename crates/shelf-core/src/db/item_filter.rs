//! Item filter builder for constructing dynamic SQL queries
//!
//! Used by filtered item listings (search candidates) and item counts so the
//! WHERE clause and its parameters are assembled in one place.

use chrono::{DateTime, Datelike, Utc};

use super::format_datetime;

/// Stored timestamps are four-digit-year RFC 3339 strings compared as text
const STORAGE_MIN: &str = "0000-01-01T00:00:00.000000Z";
const STORAGE_MAX: &str = "9999-12-31T23:59:59.999999Z";

/// Render a bound so text comparison against stored timestamps stays ordered
fn storage_bound(dt: &DateTime<Utc>) -> String {
    match dt.year() {
        y if y < 0 => STORAGE_MIN.to_string(),
        y if y > 9999 => STORAGE_MAX.to_string(),
        _ => format_datetime(dt),
    }
}

/// Builder for constructing item query filters
///
/// The lifetime `'query` covers the borrowed owner and category id slice.
#[derive(Default)]
pub struct ItemFilter<'query> {
    pub owner: Option<&'query str>,
    pub category_ids: Option<&'query [i64]>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> ItemFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to items of one owner
    pub fn owner(mut self, owner: Option<&'query str>) -> Self {
        self.owner = owner;
        self
    }

    /// Restrict to a set of categories (an empty set matches nothing)
    pub fn category_ids(mut self, ids: Option<&'query [i64]>) -> Self {
        self.category_ids = ids;
        self
    }

    /// Inclusive lower bound on created_at
    pub fn created_from(mut self, from: Option<DateTime<Utc>>) -> Self {
        self.created_from = from;
        self
    }

    /// Inclusive upper bound on created_at
    pub fn created_to(mut self, to: Option<DateTime<Utc>>) -> Self {
        self.created_to = to;
        self
    }

    pub fn build(self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(owner) = self.owner {
            conditions.push("i.owner = ?".to_string());
            params.push(Box::new(owner.to_string()));
        }

        if let Some(ids) = self.category_ids {
            if ids.is_empty() {
                conditions.push("0".to_string());
            } else {
                let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
                conditions.push(format!("i.category_id IN ({})", placeholders.join(", ")));
                for id in ids {
                    params.push(Box::new(*id));
                }
            }
        }

        if let Some(from) = self.created_from {
            conditions.push("i.created_at >= ?".to_string());
            params.push(Box::new(storage_bound(&from)));
        }

        if let Some(to) = self.created_to {
            conditions.push("i.created_at <= ?".to_string());
            params.push(Box::new(storage_bound(&to)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let order_clause = "ORDER BY i.created_at DESC, i.id DESC".to_string();

        FilterResult {
            where_clause,
            order_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Build a COUNT query
    pub fn build_count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM category_items i {}", self.where_clause)
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
