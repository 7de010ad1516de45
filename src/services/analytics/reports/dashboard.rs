//! The admin dashboard: overview strip, live snapshots and alert feed.
//!
//! Overview numbers are bounded by the resolved window; recent orders,
//! today's deliveries, open-ticket counts and the alert feed read the
//! current state of the shop instead.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::alerts;
use super::communication::{sender_breakdown, BySenderType};
use super::rows;
use super::ReportMeta;
use crate::domain::{ContactStatus, OrderStatus};
use crate::entities::{contact_ticket, customer, message, order};
use crate::services::analytics::buckets;
use crate::services::analytics::metrics;
use crate::services::analytics::period::{at_midnight, DateRange};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardPeriod {
    pub start_date: String,
    pub end_date: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverviewMetrics {
    pub total_orders: u64,
    pub orders_growth: String,
    pub new_orders: u64,
    pub pending_orders: u64,
    pub completed_orders: u64,
    pub total_revenue: f64,
    pub revenue_growth: String,
    pub active_customers: u64,
    pub customer_growth: String,
    pub avg_order_value: f64,
    pub avg_order_value_growth: String,
    pub pending_support_tickets: u64,
    pub resolved_support_tickets: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusDistributionRow {
    pub status: String,
    pub status_display: String,
    pub count: u64,
    pub percentage: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrendPoint {
    pub date: String,
    pub orders: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderTrends {
    pub period: String,
    pub data: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentOrderRow {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub status: String,
    pub status_display: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeliveryRow {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeliveriesToday {
    pub count: u64,
    pub deliveries: Vec<DeliveryRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderMessagesStats {
    pub total: u64,
    pub by_sender: BySenderType,
    pub unique_customers_contacted: u64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ContactStatusBreakdown {
    pub new: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactFormStats {
    pub total: u64,
    pub authenticated_users: u64,
    pub guest_users: u64,
    pub order_related: u64,
    pub general_inquiries: u64,
    pub status_breakdown: ContactStatusBreakdown,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommunicationStats {
    pub order_messages: OrderMessagesStats,
    pub contact_form: ContactFormStats,
    pub total_communications: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthSummary {
    pub order_completion_rate: f64,
    pub active_orders: u64,
    pub revenue_target: f64,
    pub revenue_achieved: f64,
    pub revenue_percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSection {
    pub period: DashboardPeriod,
    pub overview: OverviewMetrics,
    pub status_distribution: Vec<StatusDistributionRow>,
    pub order_trends: OrderTrends,
    pub recent_orders: Vec<RecentOrderRow>,
    pub deliveries_today: DeliveriesToday,
    pub communication_stats: CommunicationStats,
    pub month_summary: MonthSummary,
    pub alerts: Vec<DashboardAlert>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardReport {
    pub dashboard: DashboardSection,
    pub meta: ReportMeta,
}

/// Window-bounded slices plus the live snapshots the dashboard mixes in.
pub struct DashboardInputs<'a> {
    pub orders: &'a [order::Model],
    pub prev_orders: &'a [order::Model],
    pub recent_orders: &'a [(order::Model, Option<customer::Model>)],
    pub deliveries_today: &'a [(order::Model, Option<customer::Model>)],
    pub active_orders: &'a [order::Model],
    pub new_orders_total: u64,
    pub messages: &'a [message::Model],
    pub tickets: &'a [contact_ticket::Model],
    pub pending_tickets: u64,
    pub resolved_tickets: u64,
    pub revenue_target: f64,
}

pub fn shape_dashboard(
    inputs: &DashboardInputs,
    range: &DateRange,
    now: DateTime<Utc>,
) -> DashboardSection {
    let overview = shape_overview(inputs);
    let month_summary = shape_month_summary(inputs);

    DashboardSection {
        period: DashboardPeriod {
            start_date: range.start.date_naive().format("%Y-%m-%d").to_string(),
            end_date: range.end.date_naive().format("%Y-%m-%d").to_string(),
            label: range.label(),
        },
        overview,
        status_distribution: shape_status_distribution(inputs.orders),
        order_trends: shape_order_trends(inputs.orders, range),
        recent_orders: shape_recent_orders(inputs.recent_orders),
        deliveries_today: shape_deliveries_today(inputs.deliveries_today),
        communication_stats: shape_communication_stats(inputs.messages, inputs.tickets),
        month_summary,
        alerts: shape_alerts(inputs, now),
    }
}

fn shape_overview(inputs: &DashboardInputs) -> OverviewMetrics {
    let orders = inputs.orders;
    let prev = inputs.prev_orders;

    let total_orders = orders.len() as u64;
    let completed = rows::count_status(orders, OrderStatus::Delivered);
    let prev_completed = rows::count_status(prev, OrderStatus::Delivered);

    let revenue = metrics::currency(rows::delivered_revenue(orders));
    let prev_revenue = metrics::currency(rows::delivered_revenue(prev));

    let active_customers = rows::distinct_customers(orders);
    let prev_customers = rows::distinct_customers(prev);

    let avg_order_value = if completed == 0 {
        0.0
    } else {
        metrics::round2(revenue / completed as f64)
    };
    let prev_avg = if prev_completed == 0 {
        0.0
    } else {
        prev_revenue / prev_completed as f64
    };

    OverviewMetrics {
        total_orders,
        orders_growth: metrics::growth_label(total_orders as f64, prev.len() as f64),
        new_orders: rows::count_status(orders, OrderStatus::New),
        pending_orders: orders
            .iter()
            .filter(|o| rows::status_of(o).is_some_and(|s| s.is_in_progress()))
            .count() as u64,
        completed_orders: completed,
        total_revenue: revenue,
        revenue_growth: metrics::growth_label(revenue, prev_revenue),
        active_customers,
        customer_growth: metrics::growth_label(active_customers as f64, prev_customers as f64),
        avg_order_value,
        avg_order_value_growth: metrics::growth_label(avg_order_value, prev_avg),
        pending_support_tickets: inputs.pending_tickets,
        resolved_support_tickets: inputs.resolved_tickets,
    }
}

/// One row per status, zero-filled, busiest first. The stable sort keeps
/// pipeline order between statuses with equal counts.
fn shape_status_distribution(orders: &[order::Model]) -> Vec<StatusDistributionRow> {
    let total = orders.len() as u64;

    let mut rows: Vec<StatusDistributionRow> =
        buckets::enum_counts(orders.iter().filter_map(rows::status_of))
            .into_iter()
            .map(|(status, count)| {
                let value: rust_decimal::Decimal = orders
                    .iter()
                    .filter(|o| rows::status_of(o) == Some(status))
                    .filter_map(|o| o.estimated_value)
                    .sum();
                StatusDistributionRow {
                    status: status.to_string(),
                    status_display: status.display_label().to_string(),
                    count,
                    percentage: metrics::percentage(count, total),
                    total_value: metrics::currency(value),
                }
            })
            .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

fn shape_order_trends(orders: &[order::Model], range: &DateRange) -> OrderTrends {
    let window = DateRange {
        start: at_midnight(range.end.date_naive() - Duration::days(6)),
        end: range.end,
    };

    let data = buckets::daily_counts(&window, orders.iter().map(|o| o.created_at))
        .into_iter()
        .map(|(date, count)| TrendPoint {
            date: date.format("%b %d").to_string(),
            orders: count,
        })
        .collect();

    OrderTrends {
        period: "Last 7 Days".to_string(),
        data,
    }
}

fn shape_recent_orders(
    recent: &[(order::Model, Option<customer::Model>)],
) -> Vec<RecentOrderRow> {
    recent
        .iter()
        .take(6)
        .map(|(order, account)| RecentOrderRow {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_name: account
                .as_ref()
                .map_or_else(|| "unknown".to_string(), |c| c.name.clone()),
            customer_email: account
                .as_ref()
                .map_or_else(String::new, |c| c.email.clone()),
            status: order.status.clone(),
            status_display: rows::status_of(order)
                .map_or_else(|| order.status.clone(), |s| s.display_label().to_string()),
            created_at: order.created_at.format("%d %b %Y").to_string(),
        })
        .collect()
}

fn shape_deliveries_today(
    deliveries: &[(order::Model, Option<customer::Model>)],
) -> DeliveriesToday {
    let rows: Vec<DeliveryRow> = deliveries
        .iter()
        .map(|(order, account)| DeliveryRow {
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_name: account
                .as_ref()
                .map_or_else(|| "unknown".to_string(), |c| c.name.clone()),
            status: order.status.clone(),
        })
        .collect();

    DeliveriesToday {
        count: rows.len() as u64,
        deliveries: rows,
    }
}

fn shape_communication_stats(
    messages: &[message::Model],
    tickets: &[contact_ticket::Model],
) -> CommunicationStats {
    let unique_customers: std::collections::HashSet<Uuid> = messages
        .iter()
        .filter(|m| m.sender_type == "user")
        .filter_map(|m| m.sender_id)
        .collect();

    let mut status_breakdown = ContactStatusBreakdown::default();
    for ticket in tickets {
        match ticket.status.parse::<ContactStatus>() {
            Ok(ContactStatus::New) => status_breakdown.new += 1,
            Ok(ContactStatus::InProgress) => status_breakdown.in_progress += 1,
            Ok(ContactStatus::Resolved) => status_breakdown.resolved += 1,
            Ok(ContactStatus::Closed) => status_breakdown.closed += 1,
            Err(_) => {}
        }
    }

    let authenticated = tickets.iter().filter(|t| t.customer_id.is_some()).count() as u64;
    let order_related = tickets.iter().filter(|t| t.order_number.is_some()).count() as u64;
    let total_tickets = tickets.len() as u64;

    CommunicationStats {
        order_messages: OrderMessagesStats {
            total: messages.len() as u64,
            by_sender: sender_breakdown(messages),
            unique_customers_contacted: unique_customers.len() as u64,
        },
        contact_form: ContactFormStats {
            total: total_tickets,
            authenticated_users: authenticated,
            guest_users: total_tickets - authenticated,
            order_related,
            general_inquiries: total_tickets - order_related,
            status_breakdown,
        },
        total_communications: messages.len() as u64 + total_tickets,
    }
}

fn shape_month_summary(inputs: &DashboardInputs) -> MonthSummary {
    let completed = rows::count_status(inputs.orders, OrderStatus::Delivered);
    let achieved = metrics::currency(rows::delivered_revenue(inputs.orders));
    let revenue_percentage = if inputs.revenue_target > 0.0 {
        metrics::round2(achieved / inputs.revenue_target * 100.0)
    } else {
        0.0
    };

    MonthSummary {
        order_completion_rate: metrics::percentage(completed, inputs.orders.len() as u64),
        active_orders: inputs.active_orders.len() as u64,
        revenue_target: inputs.revenue_target,
        revenue_achieved: achieved,
        revenue_percentage,
    }
}

fn shape_alerts(inputs: &DashboardInputs, now: DateTime<Utc>) -> Vec<DashboardAlert> {
    let overdue = alerts::shape_timeline_alerts(inputs.active_orders, &[], now).overdue_orders;

    let mut feed = Vec::new();
    if inputs.new_orders_total > 0 {
        feed.push(DashboardAlert {
            kind: "warning".to_string(),
            title: "New Orders".to_string(),
            message: format!("{} new orders require attention", inputs.new_orders_total),
            priority: "high".to_string(),
        });
    }
    if inputs.pending_tickets > 0 {
        feed.push(DashboardAlert {
            kind: "info".to_string(),
            title: "Pending Support Tickets".to_string(),
            message: format!("{} tickets awaiting response", inputs.pending_tickets),
            priority: "medium".to_string(),
        });
    }
    if overdue > 0 {
        feed.push(DashboardAlert {
            kind: "error".to_string(),
            title: "Overdue Deliveries".to_string(),
            message: format!("{overdue} orders past their delivery date"),
            priority: "high".to_string(),
        });
    }
    feed
}
