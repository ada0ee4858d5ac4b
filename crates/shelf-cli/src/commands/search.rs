//! Search, suggestion and history command implementations

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use shelf_core::db::Database;
use shelf_core::search::{SearchEngine, SearchFilters, SearchResponse, SortBy};

use super::items::item_label;
use super::{resolve_category, truncate};

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", s))
}

/// First instant of a `YYYY-MM-DD` day in UTC
pub fn parse_date_start(s: &str) -> Result<DateTime<Utc>> {
    Ok(Utc.from_utc_datetime(&parse_day(s)?.and_time(NaiveTime::MIN)))
}

/// Last instant of a `YYYY-MM-DD` day in UTC
pub fn parse_date_end(s: &str) -> Result<DateTime<Utc>> {
    let next = parse_day(s)?
        .succ_opt()
        .with_context(|| format!("Date out of range: {}", s))?;
    Ok(Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN)) - chrono::Duration::microseconds(1))
}

/// Raw search flags as given on the command line
#[derive(Debug, Default)]
pub struct SearchArgs<'a> {
    pub categories: &'a [String],
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    pub tags: &'a [String],
    pub status: Option<&'a str>,
    pub sort: &'a str,
}

/// Turn command-line flags into engine filters
pub fn build_filters(db: &Database, owner: &str, args: &SearchArgs<'_>) -> Result<SearchFilters> {
    let category_ids = if args.categories.is_empty() {
        None
    } else {
        Some(
            args.categories
                .iter()
                .map(|c| resolve_category(db, owner, c).map(|c| c.id))
                .collect::<Result<Vec<_>>>()?,
        )
    };

    let sort_by: SortBy = args.sort.parse().map_err(anyhow::Error::msg)?;

    Ok(SearchFilters {
        category_ids,
        date_from: args.from.map(parse_date_start).transpose()?,
        date_to: args.to.map(parse_date_end).transpose()?,
        rating_min: args.rating_min,
        rating_max: args.rating_max,
        tags: (!args.tags.is_empty()).then(|| args.tags.to_vec()),
        status: args.status.map(str::to_string),
        sort_by,
    })
}

fn print_response(response: &SearchResponse) {
    if response.results.is_empty() {
        println!("No results for '{}'.", response.query);
        return;
    }

    println!();
    println!(
        "🔎 {} result{} for '{}' (sorted by {})",
        response.total_count,
        if response.total_count == 1 { "" } else { "s" },
        response.query,
        response.filters.sort_by
    );
    println!("   ─────────────────────────────────────────────────────────────");
    for result in &response.results {
        println!(
            "   {:>3}  {} {:<36} {:<14} [{}]",
            result.rank,
            result.category.icon.as_deref().unwrap_or("📁"),
            truncate(&item_label(&result.item), 36),
            truncate(&result.category.name, 14),
            result.matched_fields.join(", ")
        );
    }
}

pub async fn cmd_search(
    engine: &SearchEngine,
    query: &str,
    filters: SearchFilters,
    json: bool,
) -> Result<SearchResponse> {
    let response = engine.search(query, filters).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    Ok(response)
}

pub fn cmd_suggest(engine: &SearchEngine, query: &str) -> Result<()> {
    let suggestions = engine.suggest(query);

    if suggestions.is_empty() {
        println!("No suggestions.");
        return Ok(());
    }

    for suggestion in &suggestions {
        println!("   🕘 {}", suggestion.text);
    }

    Ok(())
}

pub fn cmd_history(engine: &SearchEngine, clear: bool) -> Result<()> {
    if clear {
        engine
            .clear_recent_searches()
            .context("Failed to clear recent searches")?;
        println!("✅ Recent searches cleared");
        return Ok(());
    }

    let recent = engine.recent_searches();
    if recent.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    println!();
    println!("🕘 Recent searches");
    println!("   ─────────────────────────────");
    for (i, query) in recent.iter().enumerate() {
        println!("   {:>2}. {}", i + 1, query);
    }

    Ok(())
}
