//! Time-trend analytics: dense daily and monthly series, trailing growth
//! and peak-activity read-outs.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::ReportMeta;
use crate::entities::order;
use crate::services::analytics::buckets;
use crate::services::analytics::metrics;
use crate::services::analytics::period::DateRange;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyOrderPoint {
    pub date: String,
    pub day_name: String,
    pub orders: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeeklySummary {
    pub total_orders: u64,
    pub avg_daily_orders: f64,
    pub peak_day: Option<String>,
    pub peak_day_orders: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyGrowthPoint {
    pub month: String,
    pub year: i32,
    pub orders: u64,
    pub growth_percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuarterlyPoint {
    pub quarter: String,
    pub orders: u64,
    pub growth_percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PeakActivity {
    pub peak_hour: Option<String>,
    pub peak_day_of_week: Option<String>,
    pub peak_month: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimeTrendsSection {
    pub daily_orders: Vec<DailyOrderPoint>,
    pub weekly_summary: WeeklySummary,
    pub monthly_growth: Vec<MonthlyGrowthPoint>,
    pub peak_activity: PeakActivity,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimeTrendsReport {
    pub time_trends: TimeTrendsSection,
    pub meta: ReportMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyVolumePoint {
    pub date: String,
    pub orders: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyVolumeReport {
    pub series: Vec<DailyVolumePoint>,
    pub meta: ReportMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyVolumePoint {
    pub month: String,
    pub orders: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyVolumeReport {
    pub series: Vec<MonthlyVolumePoint>,
    pub meta: ReportMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyGrowthReport {
    pub months: Vec<MonthlyGrowthPoint>,
    pub quarterly: Vec<QuarterlyPoint>,
    pub meta: ReportMeta,
}

/// `trailing_monthly` carries `(year, month) -> count` pairs for the growth
/// strip, oldest first; the daily series and peaks come from `orders`.
pub fn shape_time_trends(
    orders: &[order::Model],
    range: &DateRange,
    trailing_monthly: &[((i32, u32), u64)],
) -> TimeTrendsSection {
    let daily_orders = shape_daily_series(orders, range);
    let weekly_summary = shape_weekly_summary(&daily_orders);

    TimeTrendsSection {
        daily_orders,
        weekly_summary,
        monthly_growth: shape_monthly_growth(trailing_monthly),
        peak_activity: shape_peak_activity(orders, range),
    }
}

pub fn shape_daily_series(orders: &[order::Model], range: &DateRange) -> Vec<DailyOrderPoint> {
    let mut revenue: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for order in orders {
        if let Some(value) = order.estimated_value {
            *revenue
                .entry(order.created_at.date_naive())
                .or_insert(Decimal::ZERO) += value;
        }
    }

    buckets::daily_counts(range, orders.iter().map(|o| o.created_at))
        .into_iter()
        .map(|(date, count)| DailyOrderPoint {
            date: date.format("%Y-%m-%d").to_string(),
            day_name: date.format("%A").to_string(),
            orders: count,
            revenue: metrics::currency(revenue.get(&date).copied().unwrap_or_default()),
        })
        .collect()
}

fn shape_weekly_summary(series: &[DailyOrderPoint]) -> WeeklySummary {
    let total_orders: u64 = series.iter().map(|p| p.orders).sum();
    let avg_daily_orders = if series.is_empty() {
        0.0
    } else {
        metrics::round2(total_orders as f64 / series.len() as f64)
    };

    let peak = series
        .iter()
        .max_by(|a, b| a.orders.cmp(&b.orders).then_with(|| b.date.cmp(&a.date)))
        .filter(|p| p.orders > 0);

    WeeklySummary {
        total_orders,
        avg_daily_orders,
        peak_day: peak.map(|p| p.date.clone()),
        peak_day_orders: peak.map_or(0, |p| p.orders),
    }
}

/// Growth for each entry is relative to the previous one; the series opener
/// has nothing to compare against and reports zero.
pub fn shape_monthly_growth(counts: &[((i32, u32), u64)]) -> Vec<MonthlyGrowthPoint> {
    counts
        .iter()
        .enumerate()
        .map(|(i, ((year, month), orders))| MonthlyGrowthPoint {
            month: buckets::month_label(*year, *month),
            year: *year,
            orders: *orders,
            growth_percentage: if i == 0 {
                0.0
            } else {
                metrics::change_percentage(*orders as f64, counts[i - 1].1 as f64)
            },
        })
        .collect()
}

pub fn shape_quarterly(counts: &[((i32, u32), u64)]) -> Vec<QuarterlyPoint> {
    counts
        .iter()
        .enumerate()
        .map(|(i, ((year, quarter), orders))| QuarterlyPoint {
            quarter: format!("Q{quarter} {year}"),
            orders: *orders,
            growth_percentage: if i == 0 {
                0.0
            } else {
                metrics::change_percentage(*orders as f64, counts[i - 1].1 as f64)
            },
        })
        .collect()
}

fn shape_peak_activity(orders: &[order::Model], range: &DateRange) -> PeakActivity {
    let hours = buckets::hour_histogram(orders.iter().map(|o| o.created_at));
    let weekdays = buckets::weekday_histogram(orders.iter().map(|o| o.created_at));
    let months = buckets::monthly_counts(range, orders.iter().map(|o| o.created_at));

    let peak_month = months
        .iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| (b.0).cmp(&a.0)))
        .filter(|(_, count)| *count > 0)
        .map(|((year, month), _)| buckets::month_label(*year, *month));

    PeakActivity {
        peak_hour: buckets::peak_slot(&hours).map(buckets::hour_range_label),
        peak_day_of_week: buckets::peak_slot(&weekdays).map(|i| WEEKDAY_NAMES[i].to_string()),
        peak_month,
    }
}

pub fn shape_daily_volume(orders: &[order::Model], range: &DateRange) -> Vec<DailyVolumePoint> {
    buckets::daily_counts(range, orders.iter().map(|o| o.created_at))
        .into_iter()
        .map(|(date, count)| DailyVolumePoint {
            date: date.format("%Y-%m-%d").to_string(),
            orders: count,
        })
        .collect()
}

pub fn shape_monthly_volume(orders: &[order::Model], range: &DateRange) -> Vec<MonthlyVolumePoint> {
    buckets::monthly_counts(range, orders.iter().map(|o| o.created_at))
        .into_iter()
        .map(|((year, month), count)| MonthlyVolumePoint {
            month: format!("{year:04}-{month:02}"),
            orders: count,
        })
        .collect()
}
