//! Search engine - free-text matching and ranking over a user's items
//!
//! Items are fetched through a [`DataGateway`] and matched in memory:
//! every query token is looked up in a lowercase JSON rendering of the
//! item's data, title-like fields earn a boost, and rating/status/tag
//! filters are applied after matching. Successful searches are recorded
//! in the recent-search history.

mod rank;
mod types;

pub use rank::{passes_filters, score_item, sort_results, tokenize, Score, TITLE_BOOST, TITLE_FIELDS};
pub use types::{SearchFilters, SearchResponse, SearchResult, SortBy, Suggestion, SuggestionType};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::gateway::DataGateway;
use crate::history::{self, HistoryStore};

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Clone)]
pub struct SearchEngine {
    gateway: Arc<dyn DataGateway>,
    history: Arc<dyn HistoryStore>,
}

impl SearchEngine {
    pub fn new(gateway: Arc<dyn DataGateway>, history: Arc<dyn HistoryStore>) -> Self {
        Self { gateway, history }
    }

    /// Search all of the caller's categories (or `filters.category_ids`)
    ///
    /// Gateway errors are returned unchanged.
    pub async fn search(&self, query: &str, filters: SearchFilters) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            return Ok(SearchResponse::empty(query, filters));
        }

        let categories = self.gateway.list_owned_categories().await?;
        let lookup: HashMap<i64, _> = categories.iter().map(|c| (c.id, c)).collect();

        let candidates: Vec<i64> = match filters.category_ids.as_deref() {
            Some(ids) if !ids.is_empty() => ids.to_vec(),
            _ => categories.iter().map(|c| c.id).collect(),
        };
        if candidates.is_empty() {
            return Ok(SearchResponse::empty(query, filters));
        }

        let items = self
            .gateway
            .list_items_in(&candidates, filters.date_from, filters.date_to)
            .await?;
        let retrieved = items.len();
        if items.is_empty() {
            return Ok(SearchResponse::empty(query, filters));
        }

        let tokens = tokenize(query);
        let mut results = Vec::new();
        for item in items {
            let Some(category) = lookup.get(&item.category_id) else {
                continue;
            };
            let Some(score) = score_item(&item.data, &tokens) else {
                continue;
            };
            if !passes_filters(&item, &filters) {
                continue;
            }
            results.push(SearchResult {
                category: (*category).clone(),
                item,
                matched_fields: score.matched_fields,
                rank: score.rank,
            });
        }

        sort_results(&mut results, filters.sort_by);
        debug!(
            query,
            candidates = candidates.len(),
            retrieved,
            matched = results.len(),
            "Search complete"
        );

        if let Err(e) = history::record_search(self.history.as_ref(), query) {
            warn!(error = %e, "Failed to save recent search");
        }

        Ok(SearchResponse {
            total_count: results.len(),
            results,
            query: query.to_string(),
            filters,
        })
    }

    /// Search restricted to one category
    pub async fn search_by_category(
        &self,
        category_id: i64,
        query: &str,
        filters: SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        let filters = SearchFilters {
            category_ids: Some(vec![category_id]),
            ..filters
        };
        Ok(self.search(query, filters).await?.results)
    }

    /// Recent searches containing `query` (case-insensitive)
    pub fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.to_lowercase();
        self.history
            .get()
            .into_iter()
            .filter(|q| q.to_lowercase().contains(&needle))
            .take(MAX_SUGGESTIONS)
            .map(Suggestion::recent)
            .collect()
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.history.get()
    }

    pub fn clear_recent_searches(&self) -> Result<()> {
        self.history.clear()
    }
}
