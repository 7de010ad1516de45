//! Customer base, engagement and top-customer analytics.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ReportMeta;
use crate::domain::CustomerTier;
use crate::entities::{customer, order};
use crate::services::analytics::metrics;
use crate::services::analytics::period::{previous_period, DateRange};

/// Lifetime per-customer order aggregate, one row per customer that has
/// ever placed an order.
#[derive(Debug, Clone)]
pub struct CustomerOrderStats {
    pub customer_id: Uuid,
    pub order_count: i64,
    pub total_value: Option<Decimal>,
    pub first_order_at: Option<DateTime<Utc>>,
    pub last_order_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NewRegistrations {
    pub today: u64,
    pub week: u64,
    pub month: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBaseSection {
    pub total_customers: u64,
    pub total_admins: u64,
    pub new_registrations: NewRegistrations,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EngagementSection {
    pub active_customers: u64,
    pub inactive_customers: u64,
    pub repeat_customers: u64,
    pub avg_orders_per_customer: f64,
    pub customer_retention_rate: f64,
    pub avg_days_between_orders: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopCustomerEntry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub orders_count: u64,
    pub total_value: f64,
    pub status: String,
    pub last_order_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BehaviorSection {
    pub first_time_customers: u64,
    pub returning_customers: u64,
    /// No data source yet; reported as null rather than a made-up number.
    pub satisfaction_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerAnalyticsSection {
    pub user_base: UserBaseSection,
    pub engagement: EngagementSection,
    pub top_customers: Vec<TopCustomerEntry>,
    pub behavior: BehaviorSection,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerAnalyticsReport {
    pub customer_analytics: CustomerAnalyticsSection,
    pub meta: ReportMeta,
}

/// `customers` is the full account table, `stats` the lifetime per-customer
/// aggregates and `period_orders` the orders inside the resolved window.
pub fn shape_customer_analytics(
    customers: &[customer::Model],
    stats: &[CustomerOrderStats],
    period_orders: &[order::Model],
    range: &DateRange,
    now: DateTime<Utc>,
) -> CustomerAnalyticsSection {
    let regular: Vec<&customer::Model> = customers.iter().filter(|c| !c.is_admin).collect();

    CustomerAnalyticsSection {
        user_base: shape_user_base(&regular, customers, range, now),
        engagement: shape_engagement(&regular, stats, period_orders),
        top_customers: shape_top_customers(customers, stats),
        behavior: BehaviorSection {
            first_time_customers: stats.iter().filter(|s| s.order_count == 1).count() as u64,
            returning_customers: stats.iter().filter(|s| s.order_count > 1).count() as u64,
            satisfaction_score: None,
        },
    }
}

fn shape_user_base(
    regular: &[&customer::Model],
    all: &[customer::Model],
    range: &DateRange,
    now: DateTime<Utc>,
) -> UserBaseSection {
    let today = now.date_naive();
    let week_cutoff = now - Duration::days(7);
    let month_cutoff = now - Duration::days(30);

    let new_registrations = NewRegistrations {
        today: regular
            .iter()
            .filter(|c| c.created_at.date_naive() == today)
            .count() as u64,
        week: regular.iter().filter(|c| c.created_at >= week_cutoff).count() as u64,
        month: regular.iter().filter(|c| c.created_at >= month_cutoff).count() as u64,
    };

    let previous = previous_period(range);
    let current_signups = regular.iter().filter(|c| range.contains(c.created_at)).count();
    let previous_signups = regular
        .iter()
        .filter(|c| previous.contains(c.created_at))
        .count();

    UserBaseSection {
        total_customers: regular.len() as u64,
        total_admins: all.iter().filter(|c| c.is_admin).count() as u64,
        new_registrations,
        growth_rate: metrics::change_percentage(current_signups as f64, previous_signups as f64),
    }
}

fn shape_engagement(
    regular: &[&customer::Model],
    stats: &[CustomerOrderStats],
    period_orders: &[order::Model],
) -> EngagementSection {
    let total_customers = regular.len() as u64;
    let active: HashSet<Uuid> = period_orders.iter().map(|o| o.customer_id).collect();
    let repeat = stats.iter().filter(|s| s.order_count > 1).count() as u64;

    let lifetime_orders: i64 = stats.iter().map(|s| s.order_count).sum();
    let avg_orders_per_customer = if total_customers == 0 {
        0.0
    } else {
        metrics::round2(lifetime_orders as f64 / total_customers as f64)
    };

    let gaps: Vec<f64> = stats
        .iter()
        .filter(|s| s.order_count > 1)
        .filter_map(|s| {
            let first = s.first_order_at?;
            let last = s.last_order_at?;
            Some(metrics::duration_days(last - first) / (s.order_count - 1) as f64)
        })
        .collect();

    EngagementSection {
        active_customers: active.len() as u64,
        // inactive = registered customers with no order inside the window
        inactive_customers: total_customers.saturating_sub(active.len() as u64),
        repeat_customers: repeat,
        avg_orders_per_customer,
        customer_retention_rate: metrics::percentage(repeat, total_customers),
        avg_days_between_orders: metrics::round1(metrics::safe_avg(&gaps)),
    }
}

fn shape_top_customers(
    customers: &[customer::Model],
    stats: &[CustomerOrderStats],
) -> Vec<TopCustomerEntry> {
    let lookup: HashMap<Uuid, &customer::Model> =
        customers.iter().map(|c| (c.id, c)).collect();

    let mut ranked: Vec<&CustomerOrderStats> = stats
        .iter()
        .filter(|s| lookup.get(&s.customer_id).is_some_and(|c| !c.is_admin))
        .collect();
    ranked.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    ranked.truncate(10);

    ranked
        .into_iter()
        .filter_map(|s| {
            let account = lookup.get(&s.customer_id)?;
            Some(TopCustomerEntry {
                id: account.id,
                name: account.name.clone(),
                email: account.email.clone(),
                orders_count: s.order_count.max(0) as u64,
                total_value: metrics::currency(s.total_value.unwrap_or_default()),
                status: CustomerTier::from_order_count(s.order_count.max(0) as u64).to_string(),
                last_order_date: s
                    .last_order_at
                    .map(|at| at.date_naive().format("%Y-%m-%d").to_string()),
            })
        })
        .collect()
}
