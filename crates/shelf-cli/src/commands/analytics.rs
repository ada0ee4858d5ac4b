//! Analytics command implementation

use anyhow::Result;
use shelf_core::analytics::{AnalyticsData, AnalyticsEngine, Period};

/// Largest bar drawn for the activity chart
const BAR_WIDTH: usize = 30;

fn bar(count: usize, max: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    "█".repeat((count * BAR_WIDTH).div_ceil(max))
}

fn print_report(data: &AnalyticsData, period: Period) {
    let stats = &data.overall_stats;

    println!();
    println!("📊 Overview");
    println!("   ─────────────────────────────");
    println!("   Categories:            {}", stats.total_categories);
    println!("   Items:                 {}", stats.total_items);
    println!("   Categories with items: {}", stats.categories_with_items);
    println!(
        "   Items per category:    {:.1}",
        stats.average_items_per_category
    );

    if !data.insights.is_empty() {
        println!();
        println!("💡 Insights");
        println!("   ─────────────────────────────");
        for insight in &data.insights {
            println!(
                "   {} {}: {} ({})",
                insight.icon, insight.title, insight.value, insight.description
            );
        }
    }

    let active: Vec<_> = data
        .time_series
        .iter()
        .filter(|p| p.count > 0)
        .collect();
    println!();
    println!("📈 Activity ({})", period);
    println!("   ─────────────────────────────");
    if active.is_empty() {
        println!("   No items added in this period");
    } else {
        let max = active.iter().map(|p| p.count).max().unwrap_or(0);
        for point in active {
            println!("   {}  {:>3} {}", point.date, point.count, bar(point.count, max));
        }
    }

    if !data.category_distribution.is_empty() {
        println!();
        println!("🗂️  By category");
        println!("   ─────────────────────────────");
        for entry in &data.category_distribution {
            println!(
                "   {} {:<20} {:>5} ({:.1}%)",
                entry.category_icon, entry.category_name, entry.count, entry.percentage
            );
        }
    }

    println!();
    println!("⭐ Ratings");
    println!("   ─────────────────────────────");
    let max = data
        .rating_distribution
        .iter()
        .map(|r| r.count)
        .max()
        .unwrap_or(0);
    for bucket in &data.rating_distribution {
        println!(
            "   {} {:>5} {}",
            "★".repeat(usize::from(bucket.rating)),
            bucket.count,
            bar(bucket.count, max)
        );
    }
}

pub async fn cmd_analytics(
    engine: &AnalyticsEngine,
    period: Period,
    json: bool,
) -> Result<AnalyticsData> {
    let data = engine.all_analytics(period).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print_report(&data, period);
    }

    Ok(data)
}
