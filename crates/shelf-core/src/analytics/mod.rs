//! Analytics engine - aggregates over a user's categories and items
//!
//! Each facet reads a fresh snapshot through the [`DataGateway`] and folds
//! it into statistics, a dense daily time series, distributions and a short
//! list of insights. [`AnalyticsEngine::all_analytics`] computes the facets
//! concurrently; they may observe slightly different snapshots.

mod dates;
mod types;

pub use dates::{calculate_streak, day_key, dense_series, month_start, period_start, Clock};
pub use types::{
    AnalyticsData, CategoryDistribution, Insight, InsightKind, InsightValue, OverallStats, Period,
    RatingBucket, TimeSeriesPoint,
};

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::gateway::{fetch_all_items, DataGateway};
use crate::models::{Category, Item};

pub const DEFAULT_CATEGORY_ICON: &str = "📁";
pub const DEFAULT_CATEGORY_COLOR: &str = "#60a5fa";

/// Categories with their items, index-aligned
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub items: Vec<Vec<Item>>,
}

impl Snapshot {
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().flatten()
    }

    pub fn total_items(&self) -> usize {
        self.items.iter().map(Vec::len).sum()
    }
}

#[derive(Clone)]
pub struct AnalyticsEngine {
    gateway: Arc<dyn DataGateway>,
    clock: Clock,
}

impl AnalyticsEngine {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Owned categories and all their items, fetched concurrently
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let categories = self.gateway.list_owned_categories().await?;
        let items = fetch_all_items(self.gateway.as_ref(), &categories).await?;
        debug!(
            categories = categories.len(),
            items = items.iter().map(Vec::len).sum::<usize>(),
            "Loaded analytics snapshot"
        );
        Ok(Snapshot { categories, items })
    }

    pub async fn overall_stats(&self) -> Result<OverallStats> {
        Ok(overall_stats(&self.snapshot().await?))
    }

    pub async fn time_series(&self, period: Period) -> Result<Vec<TimeSeriesPoint>> {
        Ok(time_series(&self.snapshot().await?, period, self.clock.now()))
    }

    pub async fn category_distribution(&self) -> Result<Vec<CategoryDistribution>> {
        Ok(category_distribution(&self.snapshot().await?))
    }

    pub async fn rating_distribution(&self) -> Result<Vec<RatingBucket>> {
        Ok(rating_distribution(&self.snapshot().await?))
    }

    pub async fn insights(&self) -> Result<Vec<Insight>> {
        Ok(insights(&self.snapshot().await?, self.clock.now()))
    }

    /// All five facets, computed concurrently; the first failure fails the call
    pub async fn all_analytics(&self, period: Period) -> Result<AnalyticsData> {
        let (overall_stats, time_series, category_distribution, rating_distribution, insights) = futures::try_join!(
            self.overall_stats(),
            self.time_series(period),
            self.category_distribution(),
            self.rating_distribution(),
            self.insights(),
        )?;

        Ok(AnalyticsData {
            overall_stats,
            time_series,
            category_distribution,
            rating_distribution,
            insights,
        })
    }
}

pub fn overall_stats(snapshot: &Snapshot) -> OverallStats {
    let total_categories = snapshot.categories.len();
    let total_items = snapshot.total_items();
    let categories_with_items = snapshot.items.iter().filter(|i| !i.is_empty()).count();

    OverallStats {
        total_categories,
        total_items,
        categories_with_items,
        average_items_per_category: if total_categories > 0 {
            total_items as f64 / total_categories as f64
        } else {
            0.0
        },
    }
}

pub fn time_series(snapshot: &Snapshot, period: Period, now: DateTime<Utc>) -> Vec<TimeSeriesPoint> {
    let start = period_start(period, now, snapshot.all_items());
    dense_series(start, now, snapshot.all_items())
}

/// Item counts per category, largest first (stable for equal counts)
pub fn category_distribution(snapshot: &Snapshot) -> Vec<CategoryDistribution> {
    let total = snapshot.total_items();
    let mut distribution: Vec<CategoryDistribution> = snapshot
        .categories
        .iter()
        .zip(&snapshot.items)
        .map(|(category, items)| CategoryDistribution {
            category_id: category.id,
            category_name: category.name.clone(),
            category_icon: category
                .icon
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string()),
            category_color: category
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
            count: items.len(),
            percentage: if total > 0 {
                items.len() as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    distribution.sort_by_key(|d| Reverse(d.count));
    distribution
}

/// Whole-star rating of an item, if `data.rating` is exactly 1, 2, 3, 4 or 5
fn star_rating(item: &Item) -> Option<u8> {
    let rating = item.data.number("rating")?;
    if rating.fract() == 0.0 && (1.0..=5.0).contains(&rating) {
        Some(rating as u8)
    } else {
        None
    }
}

/// Always five buckets, ratings 1 through 5
pub fn rating_distribution(snapshot: &Snapshot) -> Vec<RatingBucket> {
    let mut counts = [0usize; 5];
    for rating in snapshot.all_items().filter_map(star_rating) {
        counts[usize::from(rating - 1)] += 1;
    }

    (1u8..=5)
        .zip(counts)
        .map(|(rating, count)| RatingBucket { rating, count })
        .collect()
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Human-readable highlights, each emitted only when it has something to say
pub fn insights(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<Insight> {
    let category_count = snapshot.categories.len();
    if category_count == 0 {
        return vec![];
    }

    let total = snapshot.total_items();
    let mut insights = vec![Insight::stat(
        "📊",
        "Total Items Tracked",
        InsightValue::Count(total),
        format!(
            "Across {} {}",
            category_count,
            plural(category_count, "category", "categories")
        ),
    )];

    if let Some(top) = category_distribution(snapshot)
        .into_iter()
        .next()
        .filter(|d| d.count > 0)
    {
        insights.push(Insight::stat(
            &top.category_icon,
            "Most Active Category",
            InsightValue::Text(top.category_name.clone()),
            format!("{} items ({:.1}%)", top.count, top.percentage),
        ));
    }

    let ratings: Vec<f64> = snapshot
        .all_items()
        .filter_map(|i| i.data.number("rating"))
        .collect();
    if !ratings.is_empty() {
        let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
        insights.push(Insight::stat(
            "⭐",
            "Average Rating",
            InsightValue::Text(format!("{:.1}", average)),
            format!(
                "Based on {} rated {}",
                ratings.len(),
                plural(ratings.len(), "item", "items")
            ),
        ));
    }

    let streak = calculate_streak(snapshot.all_items(), now.date_naive());
    if streak > 0 {
        insights.push(Insight::achievement(
            "🔥",
            "Current Streak",
            InsightValue::Text(format!(
                "{} {}",
                streak,
                plural(streak as usize, "day", "days")
            )),
            "Keep it up!".to_string(),
        ));
    }

    let since = month_start(now);
    let this_month = snapshot
        .all_items()
        .filter(|i| i.created_at >= since)
        .count();
    if this_month > 0 {
        insights.push(Insight::stat(
            "📅",
            "This Month",
            InsightValue::Count(this_month),
            format!("{} {} added", this_month, plural(this_month, "item", "items")),
        ));
    }

    let statuses: Vec<&str> = snapshot
        .all_items()
        .filter_map(|i| i.data.string("status"))
        .filter(|s| !s.is_empty())
        .collect();
    if !statuses.is_empty() {
        let completed = statuses
            .iter()
            .filter(|s| s.to_lowercase().contains("complete"))
            .count();
        let rate = completed as f64 / statuses.len() as f64 * 100.0;
        insights.push(Insight::stat(
            "✅",
            "Completion Rate",
            InsightValue::Text(format!("{}%", rate.round() as i64)),
            format!("{} of {} completed", completed, statuses.len()),
        ));
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{category, item_at, MemoryGateway};
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 15, 30, 0).unwrap()
    }

    fn engine(gateway: MemoryGateway) -> AnalyticsEngine {
        AnalyticsEngine::new(Arc::new(gateway)).with_clock(Clock::Fixed(now()))
    }

    fn populated() -> MemoryGateway {
        let mut books = category(1, "Books");
        books.icon = Some("📚".to_string());
        let movies = category(2, "Movies");
        let n = now();

        MemoryGateway::new()
            .with_category(books)
            .with_category(movies)
            .with_category(category(3, "Empty"))
            .with_item(item_at(1, 1, json!({"title": "Dune", "rating": 5, "status": "Completed"}), n))
            .with_item(item_at(2, 1, json!({"title": "Emma", "rating": 4, "status": "Reading"}), n - Duration::days(1)))
            .with_item(item_at(3, 1, json!({"title": "Ulysses", "rating": 4.5}), n - Duration::days(40)))
            .with_item(item_at(4, 2, json!({"title": "Heat", "rating": "5", "status": "completed"}), n - Duration::days(3)))
    }

    #[tokio::test]
    async fn test_overall_stats() {
        let stats = engine(populated()).overall_stats().await.unwrap();
        assert_eq!(stats.total_categories, 3);
        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.categories_with_items, 2);
        assert!((stats.average_items_per_category - 4.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_gateway() {
        let engine = engine(MemoryGateway::new());
        assert_eq!(engine.overall_stats().await.unwrap(), OverallStats::default());
        assert!(engine.category_distribution().await.unwrap().is_empty());
        assert!(engine.insights().await.unwrap().is_empty());

        let ratings = engine.rating_distribution().await.unwrap();
        assert_eq!(ratings.iter().map(|r| r.rating).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(ratings.iter().all(|r| r.count == 0));

        let series = engine.time_series(Period::All).await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, "2024-05-20");
    }

    #[tokio::test]
    async fn test_time_series_lengths() {
        let engine = engine(populated());
        for (period, days) in [(Period::Week, 8), (Period::Month, 31), (Period::Quarter, 91)] {
            let series = engine.time_series(period).await.unwrap();
            assert_eq!(series.len(), days, "period {}", period);
            assert_eq!(series.last().unwrap().date, "2024-05-20");
        }

        let year = engine.time_series(Period::Year).await.unwrap();
        assert_eq!(year.len(), 367);
        assert_eq!(year[0].date, "2023-05-20");

        let all = engine.time_series(Period::All).await.unwrap();
        assert_eq!(all.len(), 41);
        assert_eq!(all.iter().map(|p| p.count).sum::<usize>(), 4);
    }

    #[tokio::test]
    async fn test_week_series_counts() {
        let series = engine(populated()).time_series(Period::Week).await.unwrap();
        let counts: Vec<_> = series.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 1, 0, 1, 1]);
    }

    #[tokio::test]
    async fn test_category_distribution() {
        let distribution = engine(populated()).category_distribution().await.unwrap();
        let names: Vec<_> = distribution.iter().map(|d| d.category_name.as_str()).collect();
        assert_eq!(names, vec!["Books", "Movies", "Empty"]);
        assert_eq!(distribution[0].category_icon, "📚");
        assert_eq!(distribution[1].category_icon, DEFAULT_CATEGORY_ICON);
        assert_eq!(distribution[1].category_color, DEFAULT_CATEGORY_COLOR);

        let sum: f64 = distribution.iter().map(|d| d.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(distribution[2].percentage, 0.0);
    }

    #[tokio::test]
    async fn test_distribution_zero_items() {
        let gateway = MemoryGateway::new()
            .with_category(category(1, "A"))
            .with_category(category(2, "B"));
        let distribution = engine(gateway).category_distribution().await.unwrap();
        assert_eq!(distribution.len(), 2);
        assert!(distribution.iter().all(|d| d.percentage == 0.0));
        // Equal counts keep gateway order
        assert_eq!(distribution[0].category_id, 1);
    }

    #[tokio::test]
    async fn test_rating_distribution_whole_stars_only() {
        let ratings = engine(populated()).rating_distribution().await.unwrap();
        let counts: Vec<_> = ratings.iter().map(|r| r.count).collect();
        // 4.5 and "5" are ignored
        assert_eq!(counts, vec![0, 0, 0, 1, 1]);
    }

    #[tokio::test]
    async fn test_insights() {
        let insights = engine(populated()).insights().await.unwrap();
        let titles: Vec<_> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Total Items Tracked",
                "Most Active Category",
                "Average Rating",
                "Current Streak",
                "This Month",
                "Completion Rate"
            ]
        );

        assert_eq!(insights[0].value, InsightValue::Count(4));
        assert_eq!(insights[0].description, "Across 3 categories");

        assert_eq!(insights[1].icon, "📚");
        assert_eq!(insights[1].value, InsightValue::Text("Books".to_string()));
        assert_eq!(insights[1].description, "3 items (75.0%)");

        // (5 + 4 + 4.5) / 3
        assert_eq!(insights[2].value, InsightValue::Text("4.5".to_string()));
        assert_eq!(insights[2].description, "Based on 3 rated items");

        assert_eq!(insights[3].kind, InsightKind::Achievement);
        assert_eq!(insights[3].value, InsightValue::Text("2 days".to_string()));

        assert_eq!(insights[4].value, InsightValue::Count(3));
        assert_eq!(insights[4].description, "3 items added");

        // Completed, Reading, completed
        assert_eq!(insights[5].value, InsightValue::Text("67%".to_string()));
        assert_eq!(insights[5].description, "2 of 3 completed");
    }

    #[tokio::test]
    async fn test_insights_preconditions() {
        let old = now() - Duration::days(60);
        let gateway = MemoryGateway::new()
            .with_category(category(1, "Books"))
            .with_item(item_at(1, 1, json!({"title": "Old"}), old));
        let insights = engine(gateway).insights().await.unwrap();
        let titles: Vec<_> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Total Items Tracked", "Most Active Category"]);
        assert_eq!(insights[0].description, "Across 1 category");
        assert_eq!(insights[1].description, "1 items (100.0%)");
    }

    #[tokio::test]
    async fn test_all_analytics() {
        let data = engine(populated()).all_analytics(Period::Week).await.unwrap();
        assert_eq!(data.overall_stats.total_items, 4);
        assert_eq!(data.time_series.len(), 8);
        assert_eq!(data.category_distribution.len(), 3);
        assert_eq!(data.rating_distribution.len(), 5);
        assert_eq!(data.insights.len(), 6);
    }

    #[tokio::test]
    async fn test_all_analytics_fails_on_gateway_error() {
        let result = engine(populated().failing()).all_analytics(Period::Month).await;
        assert!(matches!(result, Err(crate::Error::Gateway(_))));
    }

    #[test]
    fn test_insight_serialization() {
        let insight = Insight::stat("📊", "Total", InsightValue::Count(3), "d".to_string());
        let value = serde_json::to_value(&insight).unwrap();
        assert_eq!(value["type"], "stat");
        assert_eq!(value["value"], 3);
        assert_eq!(
            value.as_object().unwrap().len(),
            5,
            "type, icon, title, value and description only"
        );
        assert_eq!(serde_json::to_value(Period::Year).unwrap(), "1y");
    }
}
