//! Order analytics: status distribution, reconstructed stage timings,
//! product preferences and file activity.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::alerts::TimelineAlertsSection;
use super::rows;
use super::ReportMeta;
use crate::domain::OrderStatus;
use crate::entities::{order, order_file};
use crate::services::analytics::buckets;
use crate::services::analytics::metrics;
use crate::services::analytics::transitions::StagePerformanceRow;

/// Diamond size buckets in carats, lower bound inclusive.
const DIAMOND_BINS: [(f64, f64, &str); 4] = [
    (0.0, 0.5, "0-0.5ct"),
    (0.5, 1.0, "0.5-1ct"),
    (1.0, 2.0, "1-2ct"),
    (2.0, f64::INFINITY, "2ct+"),
];

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusGroupEntry {
    pub status: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoldColorEntry {
    pub color: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiamondSizeBucket {
    pub range: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiamondSizes {
    pub avg_size: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub distribution: Vec<DiamondSizeBucket>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GoldWeights {
    pub avg_weight: f64,
    pub total_weight: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPreferences {
    pub gold_colors: Vec<GoldColorEntry>,
    pub diamond_sizes: DiamondSizes,
    pub gold_weights: GoldWeights,
    pub special_requirements_count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileActivityEntry {
    pub stage: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderAnalyticsSection {
    pub status_distribution: Vec<StatusGroupEntry>,
    pub completed_orders: u64,
    pub pending_approvals: u64,
    pub declined_orders: u64,
    pub stage_performance: Vec<StagePerformanceRow>,
    pub product_preferences: ProductPreferences,
    pub file_activity: Vec<FileActivityEntry>,
    pub timeline_alerts: TimelineAlertsSection,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderAnalyticsReport {
    pub order_analytics: OrderAnalyticsSection,
    pub meta: ReportMeta,
}

pub fn shape_order_analytics(
    orders: &[order::Model],
    files: &[order_file::Model],
    stage_performance: Vec<StagePerformanceRow>,
    timeline_alerts: TimelineAlertsSection,
) -> OrderAnalyticsSection {
    let total = orders.len() as u64;

    let delivered = rows::count_status(orders, OrderStatus::Delivered);
    let new = rows::count_status(orders, OrderStatus::New);
    let declined = rows::count_status(orders, OrderStatus::Declined);
    let in_progress = orders
        .iter()
        .filter(|o| rows::status_of(o).is_some_and(|s| s.is_in_progress()))
        .count() as u64;

    // The synthetic in_progress bucket covers every status strictly between
    // intake and the terminal outcomes. Busiest group first; the stable sort
    // keeps the declared group order between equal counts.
    let mut status_distribution: Vec<StatusGroupEntry> = [
        ("delivered", delivered),
        ("in_progress", in_progress),
        ("new", new),
        ("declined", declined),
    ]
    .into_iter()
    .map(|(status, count)| StatusGroupEntry {
        status: status.to_string(),
        count,
        percentage: metrics::percentage(count, total),
    })
    .collect();
    status_distribution.sort_by(|a, b| b.count.cmp(&a.count));

    OrderAnalyticsSection {
        status_distribution,
        completed_orders: delivered,
        pending_approvals: rows::count_status(orders, OrderStatus::CadDone),
        declined_orders: declined,
        stage_performance,
        product_preferences: shape_product_preferences(orders),
        file_activity: shape_file_activity(files),
        timeline_alerts,
    }
}

fn shape_product_preferences(orders: &[order::Model]) -> ProductPreferences {
    let color_counts = buckets::counts_by_key(
        orders
            .iter()
            .filter_map(|o| o.gold_color.as_deref())
            .map(str::to_string),
    );
    let colored_total: u64 = color_counts.values().sum();
    let gold_colors = buckets::top_n(color_counts.into_iter().collect(), usize::MAX)
        .into_iter()
        .map(|(color, count)| GoldColorEntry {
            color,
            count,
            percentage: metrics::percentage(count, colored_total),
        })
        .collect();

    let sizes: Vec<f64> = orders
        .iter()
        .filter_map(|o| o.diamond_size)
        .filter_map(|d| d.to_f64())
        .collect();
    let distribution = DIAMOND_BINS
        .iter()
        .map(|(lo, hi, label)| DiamondSizeBucket {
            range: label.to_string(),
            count: sizes.iter().filter(|s| **s >= *lo && **s < *hi).count() as u64,
        })
        .collect();
    let diamond_sizes = DiamondSizes {
        avg_size: metrics::safe_avg(&sizes),
        min_size: metrics::round2(sizes.iter().copied().reduce(f64::min).unwrap_or(0.0)),
        max_size: metrics::round2(sizes.iter().copied().reduce(f64::max).unwrap_or(0.0)),
        distribution,
    };

    let weights: Vec<Decimal> = orders.iter().filter_map(|o| o.gold_weight).collect();
    let weight_values: Vec<f64> = weights.iter().filter_map(|w| w.to_f64()).collect();
    let gold_weights = GoldWeights {
        avg_weight: metrics::safe_avg(&weight_values),
        total_weight: metrics::currency(weights.iter().sum::<Decimal>()),
    };

    ProductPreferences {
        gold_colors,
        diamond_sizes,
        gold_weights,
        special_requirements_count: orders
            .iter()
            .filter(|o| {
                o.special_requirements
                    .as_deref()
                    .is_some_and(|s| !s.trim().is_empty())
            })
            .count() as u64,
    }
}

fn shape_file_activity(files: &[order_file::Model]) -> Vec<FileActivityEntry> {
    let total = files.len() as u64;
    let counts = buckets::counts_by_key(files.iter().map(|f| f.stage.clone()));
    buckets::top_n(counts.into_iter().collect(), usize::MAX)
        .into_iter()
        .map(|(stage, count)| FileActivityEntry {
            stage,
            count,
            percentage: metrics::percentage(count, total),
        })
        .collect()
}
