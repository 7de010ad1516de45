//! Headline KPI cards: six metrics, each with its change against the
//! previous period of equal length.

use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::communication::settled_rate;
use super::rows;
use super::ReportMeta;
use crate::domain::OrderStatus;
use crate::entities::{contact_ticket, order};
use crate::services::analytics::metrics;

const CHANGE_LABEL: &str = "vs previous period";

/// One KPI card. Counts are plain numbers; rates and durations carry their
/// unit as a formatted string.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KpiValue {
    #[schema(value_type = Object)]
    pub value: Value,
    pub change_percentage: f64,
    pub change_label: String,
}

impl KpiValue {
    fn count(value: u64, change_percentage: f64) -> Self {
        Self {
            value: json!(value),
            change_percentage,
            change_label: CHANGE_LABEL.to_string(),
        }
    }

    fn text(value: String, change_percentage: f64) -> Self {
        Self {
            value: json!(value),
            change_percentage,
            change_label: CHANGE_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KpiSection {
    pub total_orders: KpiValue,
    pub active_customers: KpiValue,
    pub avg_completion_time: KpiValue,
    pub support_resolution_rate: KpiValue,
    pub completion_rate: KpiValue,
    pub pending_approvals: KpiValue,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KpiReport {
    pub kpi: KpiSection,
    pub meta: ReportMeta,
}

/// Preloaded inputs for the KPI cards: the current window's rows, the
/// previous window's rows, and reconstructed completion times for both.
pub struct KpiInputs<'a> {
    pub orders: &'a [order::Model],
    pub prev_orders: &'a [order::Model],
    pub tickets: &'a [contact_ticket::Model],
    pub prev_tickets: &'a [contact_ticket::Model],
    pub completion_days: &'a [f64],
    pub prev_completion_days: &'a [f64],
}

pub fn shape_kpi(inputs: &KpiInputs) -> KpiSection {
    let total = inputs.orders.len() as u64;
    let prev_total = inputs.prev_orders.len() as u64;

    let active = rows::distinct_customers(inputs.orders);
    let prev_active = rows::distinct_customers(inputs.prev_orders);

    let avg_completion = metrics::safe_avg(inputs.completion_days);
    let prev_avg_completion = metrics::safe_avg(inputs.prev_completion_days);
    let avg_completion_card = if inputs.completion_days.is_empty() {
        KpiValue::text("N/A".to_string(), 0.0)
    } else {
        KpiValue::text(
            format!("{avg_completion:.1} days"),
            metrics::change_percentage(avg_completion, prev_avg_completion),
        )
    };

    let resolution = settled_rate(inputs.tickets);
    let prev_resolution = settled_rate(inputs.prev_tickets);

    let completion_rate =
        metrics::percentage(rows::count_status(inputs.orders, OrderStatus::Delivered), total);
    let prev_completion_rate = metrics::percentage(
        rows::count_status(inputs.prev_orders, OrderStatus::Delivered),
        prev_total,
    );

    let pending = rows::count_status(inputs.orders, OrderStatus::CadDone);
    let prev_pending = rows::count_status(inputs.prev_orders, OrderStatus::CadDone);

    KpiSection {
        total_orders: KpiValue::count(
            total,
            metrics::change_percentage(total as f64, prev_total as f64),
        ),
        active_customers: KpiValue::count(
            active,
            metrics::change_percentage(active as f64, prev_active as f64),
        ),
        avg_completion_time: avg_completion_card,
        support_resolution_rate: KpiValue::text(
            format!("{resolution:.1}%"),
            metrics::change_percentage(resolution, prev_resolution),
        ),
        completion_rate: KpiValue::text(
            format!("{completion_rate:.1}%"),
            metrics::change_percentage(completion_rate, prev_completion_rate),
        ),
        pending_approvals: KpiValue::count(
            pending,
            metrics::change_percentage(pending as f64, prev_pending as f64),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{at, order, ticket};
    use super::*;

    fn inputs<'a>(
        orders: &'a [order::Model],
        prev_orders: &'a [order::Model],
        tickets: &'a [contact_ticket::Model],
        completion_days: &'a [f64],
    ) -> KpiInputs<'a> {
        KpiInputs {
            orders,
            prev_orders,
            tickets,
            prev_tickets: &[],
            completion_days,
            prev_completion_days: &[],
        }
    }

    #[test]
    fn empty_period_yields_zeroed_cards() {
        let kpi = shape_kpi(&inputs(&[], &[], &[], &[]));

        assert_eq!(kpi.total_orders.value, json!(0));
        assert_eq!(kpi.total_orders.change_percentage, 0.0);
        assert_eq!(kpi.avg_completion_time.value, json!("N/A"));
        assert_eq!(kpi.support_resolution_rate.value, json!("0.0%"));
        assert_eq!(kpi.completion_rate.value, json!("0.0%"));
        assert_eq!(kpi.pending_approvals.value, json!(0));
    }

    #[test]
    fn growth_against_empty_previous_period_is_plus_hundred() {
        let orders = vec![order("new", at(2025, 3, 2, 9))];
        let kpi = shape_kpi(&inputs(&orders, &[], &[], &[]));

        assert_eq!(kpi.total_orders.value, json!(1));
        assert_eq!(kpi.total_orders.change_percentage, 100.0);
        assert_eq!(kpi.total_orders.change_label, "vs previous period");
    }

    #[test]
    fn completion_and_resolution_rates_are_period_shares() {
        let orders = vec![
            order("delivered", at(2025, 3, 2, 9)),
            order("delivered", at(2025, 3, 3, 9)),
            order("cad_done", at(2025, 3, 4, 9)),
            order("new", at(2025, 3, 5, 9)),
        ];
        let tickets = vec![
            ticket("resolved", at(2025, 3, 2, 9)),
            ticket("closed", at(2025, 3, 3, 9)),
            ticket("new", at(2025, 3, 4, 9)),
            ticket("in_progress", at(2025, 3, 5, 9)),
        ];

        let kpi = shape_kpi(&inputs(&orders, &[], &tickets, &[]));

        assert_eq!(kpi.completion_rate.value, json!("50.0%"));
        assert_eq!(kpi.support_resolution_rate.value, json!("50.0%"));
        assert_eq!(kpi.pending_approvals.value, json!(1));
    }

    #[test]
    fn completion_time_averages_reconstructed_days() {
        let orders = vec![order("delivered", at(2025, 3, 2, 9))];
        let days = [10.0, 14.0];
        let kpi = shape_kpi(&inputs(&orders, &[], &[], &days));

        assert_eq!(kpi.avg_completion_time.value, json!("12.0 days"));
        // No previous completions: treated as growth from zero.
        assert_eq!(kpi.avg_completion_time.change_percentage, 100.0);
    }

    #[test]
    fn declines_counted_in_totals_but_not_completion() {
        let orders = vec![
            order("declined", at(2025, 3, 2, 9)),
            order("delivered", at(2025, 3, 3, 9)),
        ];
        let kpi = shape_kpi(&inputs(&orders, &[], &[], &[]));

        assert_eq!(kpi.total_orders.value, json!(2));
        assert_eq!(kpi.completion_rate.value, json!("50.0%"));
    }
}
