//! Search, suggestion and recent-search handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use crate::{AppError, AppState, SuccessResponse};
use shelf_core::search::{SearchFilters, SearchResponse, SearchResult, SortBy, Suggestion};

/// Query parameters for search endpoints
///
/// `category_id` and `tag` take comma-separated lists. Dates accept RFC 3339
/// or `YYYY-MM-DD` (start of day for `date_from`, end of day for `date_to`).
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub category_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub tag: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let invalid = || AppError::bad_request(&format!("Invalid date: {}", raw));
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    if !end_of_day {
        return Ok(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)));
    }

    // Last instant of the day: next midnight minus one microsecond
    let next = day.succ_opt().ok_or_else(invalid)?;
    Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN))
        .checked_sub_signed(chrono::Duration::microseconds(1))
        .ok_or_else(invalid)
}

impl SearchQuery {
    pub fn to_filters(&self) -> Result<SearchFilters, AppError> {
        let category_ids = match self.category_id.as_deref() {
            Some(raw) => Some(
                split_list(raw)
                    .into_iter()
                    .map(|id| {
                        id.parse::<i64>()
                            .map_err(|_| AppError::bad_request(&format!("Invalid category_id: {}", id)))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        let tags = self
            .tag
            .as_deref()
            .map(|raw| split_list(raw).into_iter().map(str::to_string).collect::<Vec<_>>())
            .filter(|tags| !tags.is_empty());

        let sort_by = match self.sort_by.as_deref() {
            Some(raw) => raw
                .parse::<SortBy>()
                .map_err(|e| AppError::bad_request(&e))?,
            None => SortBy::default(),
        };

        Ok(SearchFilters {
            category_ids,
            date_from: self
                .date_from
                .as_deref()
                .map(|d| parse_bound(d, false))
                .transpose()?,
            date_to: self
                .date_to
                .as_deref()
                .map(|d| parse_bound(d, true))
                .transpose()?,
            rating_min: self.rating_min,
            rating_max: self.rating_max,
            tags,
            status: self.status.clone().filter(|s| !s.is_empty()),
            sort_by,
        })
    }
}

/// GET /api/search - Search across all owned categories
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let filters = params.to_filters()?;
    let response = state.search.search(&params.q, filters).await?;
    Ok(Json(response))
}

/// GET /api/categories/:id/search - Search within one category
pub async fn search_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>, AppError> {
    let filters = params.to_filters()?;
    let results = state.search.search_by_category(id, &params.q, filters).await?;
    Ok(Json(results))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search/suggestions - Recent searches matching a prefix
pub async fn search_suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestionsQuery>,
) -> Json<Vec<Suggestion>> {
    Json(state.search.suggest(&params.q))
}

/// GET /api/search/recent
pub async fn recent_searches(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.search.recent_searches())
}

/// DELETE /api/search/recent
pub async fn clear_recent_searches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.search.clear_recent_searches()?;
    Ok(Json(SuccessResponse { success: true }))
}
