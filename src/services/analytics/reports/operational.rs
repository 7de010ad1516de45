//! Operational insights: admin workload, audit-trail summaries and the
//! live pipeline health counts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::alerts;
use crate::entities::order_log::actions;
use crate::entities::{customer, order, order_log};
use crate::services::analytics::buckets;
use crate::services::analytics::metrics;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminActivityRow {
    pub admin_id: Uuid,
    pub admin_name: String,
    pub uploads: u64,
    pub responses: u64,
    pub declinations: u64,
    pub efficiency_score: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModifiedOrderEntry {
    pub order_id: Uuid,
    pub order_number: String,
    pub log_count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionCountEntry {
    pub action: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderLogsSummary {
    pub total_logs: u64,
    pub most_modified_orders: Vec<ModifiedOrderEntry>,
    pub action_breakdown: Vec<ActionCountEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentActivityRow {
    pub id: Uuid,
    pub action: String,
    pub order_number: String,
    pub admin_name: Option<String>,
    pub timestamp: String,
    pub time_ago: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SystemHealth {
    pub orders_on_track: u64,
    pub orders_at_risk: u64,
    /// Not tracked by this service; reserved for an external monitor.
    pub system_uptime: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OperationalSection {
    pub admin_activity: Vec<AdminActivityRow>,
    pub order_logs_summary: OrderLogsSummary,
    pub recent_activity: Vec<RecentActivityRow>,
    pub system_health: SystemHealth,
}

pub fn shape_operational(
    logs: &[order_log::Model],
    admins: &[customer::Model],
    order_lookup: &HashMap<Uuid, order::Model>,
    active_orders: &[order::Model],
    now: DateTime<Utc>,
) -> OperationalSection {
    let admin_names: HashMap<Uuid, &str> =
        admins.iter().map(|a| (a.id, a.name.as_str())).collect();

    OperationalSection {
        admin_activity: shape_admin_activity(logs, admins),
        order_logs_summary: shape_logs_summary(logs, order_lookup),
        recent_activity: shape_recent_activity(logs, order_lookup, &admin_names, now),
        system_health: shape_system_health(active_orders, now),
    }
}

/// One row per admin account, zero-activity admins included.
fn shape_admin_activity(
    logs: &[order_log::Model],
    admins: &[customer::Model],
) -> Vec<AdminActivityRow> {
    let mut rows: Vec<AdminActivityRow> = admins
        .iter()
        .map(|admin| {
            let mut uploads = 0;
            let mut responses = 0;
            let mut declinations = 0;
            for log in logs.iter().filter(|l| l.admin_id == Some(admin.id)) {
                match log.action.as_str() {
                    actions::FILE_UPLOAD => uploads += 1,
                    actions::RESPONSE => responses += 1,
                    actions::DECLINATION => declinations += 1,
                    _ => {}
                }
            }
            AdminActivityRow {
                admin_id: admin.id,
                admin_name: admin.name.clone(),
                uploads,
                responses,
                declinations,
                efficiency_score: metrics::percentage(responses, responses + declinations),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let total_a = a.uploads + a.responses + a.declinations;
        let total_b = b.uploads + b.responses + b.declinations;
        total_b
            .cmp(&total_a)
            .then_with(|| a.admin_name.cmp(&b.admin_name))
    });
    rows
}

fn shape_logs_summary(
    logs: &[order_log::Model],
    order_lookup: &HashMap<Uuid, order::Model>,
) -> OrderLogsSummary {
    let per_order = buckets::counts_by_key(logs.iter().map(|l| l.order_id));
    let most_modified_orders = buckets::top_n(per_order.into_iter().collect(), 5)
        .into_iter()
        .map(|(order_id, log_count)| ModifiedOrderEntry {
            order_id,
            order_number: order_lookup
                .get(&order_id)
                .map_or_else(|| "unknown".to_string(), |o| o.order_number.clone()),
            log_count,
        })
        .collect();

    let per_action = buckets::counts_by_key(logs.iter().map(|l| l.action.clone()));
    let action_breakdown = buckets::top_n(per_action.into_iter().collect(), 10)
        .into_iter()
        .map(|(action, count)| ActionCountEntry { action, count })
        .collect();

    OrderLogsSummary {
        total_logs: logs.len() as u64,
        most_modified_orders,
        action_breakdown,
    }
}

fn shape_recent_activity(
    logs: &[order_log::Model],
    order_lookup: &HashMap<Uuid, order::Model>,
    admin_names: &HashMap<Uuid, &str>,
    now: DateTime<Utc>,
) -> Vec<RecentActivityRow> {
    let mut recent: Vec<&order_log::Model> = logs.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

    recent
        .into_iter()
        .take(10)
        .map(|log| RecentActivityRow {
            id: log.id,
            action: log.action.clone(),
            order_number: order_lookup
                .get(&log.order_id)
                .map_or_else(|| "unknown".to_string(), |o| o.order_number.clone()),
            admin_name: log
                .admin_id
                .and_then(|id| admin_names.get(&id).map(|name| name.to_string())),
            timestamp: log.created_at.to_rfc3339(),
            time_ago: time_ago(log.created_at, now),
        })
        .collect()
}

fn shape_system_health(active_orders: &[order::Model], now: DateTime<Utc>) -> SystemHealth {
    let alerts = alerts::shape_timeline_alerts(active_orders, &[], now);
    let at_risk = alerts.approaching_deadline + alerts.overdue_orders;

    SystemHealth {
        orders_on_track: (active_orders.len() as u64).saturating_sub(at_risk),
        orders_at_risk: at_risk,
        system_uptime: None,
    }
}

/// Coarse human age of a timestamp, clamped at zero for clock skew.
pub(crate) fn time_ago(from: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - from).num_seconds().max(0);
    if seconds < 60 {
        return format!("{seconds} sec ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes} min ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hr ago");
    }
    let days = hours / 24;
    if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{days} days ago")
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{at, customer, log, order};
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn admin_rows_include_idle_admins_and_rank_by_activity() {
        let busy = customer("Busy", true, at(2025, 1, 1, 8));
        let idle = customer("Idle", true, at(2025, 1, 1, 8));
        let target = order("confirmed", at(2025, 5, 1, 9));

        let mut upload = log(target.id, actions::FILE_UPLOAD, at(2025, 5, 2, 9));
        upload.admin_id = Some(busy.id);
        let mut response = log(target.id, actions::RESPONSE, at(2025, 5, 2, 10));
        response.admin_id = Some(busy.id);
        let mut declination = log(target.id, actions::DECLINATION, at(2025, 5, 2, 11));
        declination.admin_id = Some(busy.id);

        let rows = shape_admin_activity(
            &[upload, response, declination],
            &[idle.clone(), busy.clone()],
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].admin_name, "Busy");
        assert_eq!(rows[0].uploads, 1);
        assert_eq!(rows[0].efficiency_score, 50.0);
        assert_eq!(rows[1].admin_name, "Idle");
        assert_eq!(rows[1].efficiency_score, 0.0);
    }

    #[test]
    fn logs_summary_ranks_orders_and_actions() {
        let noisy = order("confirmed", at(2025, 5, 1, 9));
        let quiet = order("new", at(2025, 5, 1, 9));
        let logs = vec![
            log(noisy.id, actions::STATUS_CHANGE, at(2025, 5, 2, 9)),
            log(noisy.id, actions::FILE_UPLOAD, at(2025, 5, 2, 10)),
            log(quiet.id, actions::ORDER_CREATED, at(2025, 5, 2, 11)),
        ];
        let lookup: HashMap<Uuid, order::Model> =
            [(noisy.id, noisy.clone()), (quiet.id, quiet.clone())].into();

        let summary = shape_logs_summary(&logs, &lookup);
        assert_eq!(summary.total_logs, 3);
        assert_eq!(summary.most_modified_orders[0].order_number, noisy.order_number);
        assert_eq!(summary.most_modified_orders[0].log_count, 2);
        assert_eq!(summary.action_breakdown.len(), 3);
        assert!(summary.action_breakdown.iter().all(|a| a.count == 1));
    }

    #[test]
    fn recent_activity_is_newest_first_and_capped() {
        let target = order("confirmed", at(2025, 5, 1, 9));
        let lookup: HashMap<Uuid, order::Model> = [(target.id, target.clone())].into();
        let logs: Vec<order_log::Model> = (0..12)
            .map(|h| log(target.id, actions::STATUS_CHANGE, at(2025, 5, 2, h)))
            .collect();

        let recent = shape_recent_activity(&logs, &lookup, &HashMap::new(), at(2025, 5, 2, 12));
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].time_ago, "1 hr ago");
        assert_eq!(recent[9].time_ago, "10 hr ago");
    }

    #[test]
    fn time_ago_switches_units_at_each_threshold() {
        let now = at(2025, 5, 10, 12);
        assert_eq!(time_ago(now, now), "0 sec ago");
        assert_eq!(time_ago(at(2025, 5, 10, 11), now), "1 hr ago");
        assert_eq!(time_ago(at(2025, 5, 9, 12), now), "1 day ago");
        assert_eq!(time_ago(at(2025, 5, 7, 12), now), "3 days ago");
        // Future timestamps clamp instead of going negative.
        assert_eq!(time_ago(at(2025, 5, 10, 13), now), "0 sec ago");
    }

    #[test]
    fn system_health_splits_active_pipeline_by_deadline() {
        let now = at(2025, 5, 10, 12);
        let mut overdue = order("casting", at(2025, 4, 1, 9));
        overdue.delivery_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        let mut close = order("ready", at(2025, 4, 1, 9));
        close.delivery_date = NaiveDate::from_ymd_opt(2025, 5, 12);
        let calm = order("confirmed", at(2025, 4, 1, 9));

        let health = shape_system_health(&[overdue, close, calm], now);
        assert_eq!(health.orders_at_risk, 2);
        assert_eq!(health.orders_on_track, 1);
        assert_eq!(health.system_uptime, None);
    }
}
