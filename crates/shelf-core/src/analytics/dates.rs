//! Calendar helpers for analytics (all in UTC)

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};

use super::types::{Period, TimeSeriesPoint};
use crate::models::Item;

/// Source of "now"
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    /// A pinned instant (tests, reproducible reports)
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(at) => *at,
        }
    }
}

/// `YYYY-MM-DD` of the UTC calendar day
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Start instant of a period ending at `now`
///
/// For [`Period::All`] this is the oldest item's creation time, or `now`
/// when there are no items older than it.
pub fn period_start<'a>(
    period: Period,
    now: DateTime<Utc>,
    items: impl IntoIterator<Item = &'a Item>,
) -> DateTime<Utc> {
    match period {
        Period::Year => now
            .checked_sub_months(Months::new(12))
            .unwrap_or(now - Duration::days(365)),
        Period::All => items
            .into_iter()
            .map(|i| i.created_at)
            .fold(now, |oldest, at| oldest.min(at)),
        fixed => now - Duration::days(fixed.days().unwrap_or(0)),
    }
}

/// Zero-filled daily counts from `start`'s day to `now`'s day inclusive
///
/// Only items created at or after `start` are counted.
pub fn dense_series<'a>(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    items: impl IntoIterator<Item = &'a Item>,
) -> Vec<TimeSeriesPoint> {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for item in items {
        if item.created_at >= start {
            *counts.entry(item.created_at.date_naive()).or_insert(0) += 1;
        }
    }

    let end = now.date_naive();
    start
        .date_naive()
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| TimeSeriesPoint {
            date: day_key(day),
            count: counts.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

/// Consecutive days with activity, ending today
///
/// Walks distinct creation days from the most recent; each must be exactly
/// `streak` days before `today`. Days after `today` are ignored.
pub fn calculate_streak<'a>(items: impl IntoIterator<Item = &'a Item>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = items
        .into_iter()
        .map(|i| i.created_at.date_naive())
        .filter(|d| *d <= today)
        .collect();

    let mut streak = 0u32;
    for day in days.iter().rev() {
        if (today - *day).num_days() == i64::from(streak) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// First instant of the UTC month containing `now`
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
