//! Analytics result types

use serde::{Deserialize, Serialize};

/// Reporting period for the activity time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
    /// From the oldest item onward
    #[serde(rename = "all")]
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::Year => "1y",
            Self::All => "all",
        }
    }

    /// Length in days for the fixed-width periods
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Quarter => Some(90),
            Self::Year | Self::All => None,
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "90d" => Ok(Self::Quarter),
            "1y" => Ok(Self::Year),
            "all" => Ok(Self::All),
            _ => Err(format!("Unknown period: {} (expected 7d, 30d, 90d, 1y or all)", s)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_categories: usize,
    pub total_items: usize,
    pub categories_with_items: usize,
    /// 0 when there are no categories
    pub average_items_per_category: f64,
}

/// Items created on one UTC calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub category_id: i64,
    pub category_name: String,
    pub category_icon: String,
    pub category_color: String,
    pub count: usize,
    /// Share of all items, 0-100
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Stat,
    Achievement,
}

/// Headline value of an insight: a bare count or preformatted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsightValue {
    Count(usize),
    Text(String),
}

impl std::fmt::Display for InsightValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single human-readable derived statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub icon: String,
    pub title: String,
    pub value: InsightValue,
    pub description: String,
}

impl Insight {
    pub fn stat(icon: &str, title: &str, value: InsightValue, description: String) -> Self {
        Self {
            kind: InsightKind::Stat,
            icon: icon.to_string(),
            title: title.to_string(),
            value,
            description,
        }
    }

    pub fn achievement(icon: &str, title: &str, value: InsightValue, description: String) -> Self {
        Self {
            kind: InsightKind::Achievement,
            ..Self::stat(icon, title, value, description)
        }
    }
}

/// Everything the dashboard shows, computed in one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    pub overall_stats: OverallStats,
    pub time_series: Vec<TimeSeriesPoint>,
    pub category_distribution: Vec<CategoryDistribution>,
    pub rating_distribution: Vec<RatingBucket>,
    pub insights: Vec<Insight>,
}
