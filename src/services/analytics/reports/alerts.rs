//! Delivery timeline alerts derived from order deadlines.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ReportMeta;
use crate::entities::order;

/// Days ahead within which a pending delivery counts as approaching.
const APPROACHING_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TimelineAlertsSection {
    pub same_day_orders: u64,
    pub approaching_deadline: u64,
    pub overdue_orders: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimelineAlertRow {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: String,
    pub delivery_date: String,
    /// Days until the deadline; zero when due today, negative when overdue.
    pub days_remaining: i64,
}

/// Summary counts mirror the order-analytics card (approaching includes
/// today); the row lists partition the pipeline by urgency instead.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimelineAlertsDetail {
    pub summary: TimelineAlertsSection,
    pub due_today: Vec<TimelineAlertRow>,
    pub approaching: Vec<TimelineAlertRow>,
    pub overdue: Vec<TimelineAlertRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimelineAlertsReport {
    pub timeline_alerts: TimelineAlertsDetail,
    pub meta: ReportMeta,
}

/// `active_orders` is the current open pipeline, `delivered_today` the orders
/// whose status reached delivered today. Both are snapshots, not period slices.
pub fn shape_timeline_alerts(
    active_orders: &[order::Model],
    delivered_today: &[order::Model],
    now: DateTime<Utc>,
) -> TimelineAlertsSection {
    let today = now.date_naive();
    let horizon = today + Duration::days(APPROACHING_WINDOW_DAYS);

    let same_day_orders = delivered_today
        .iter()
        .filter(|o| o.created_at.date_naive() == today && o.updated_at.date_naive() == today)
        .count() as u64;

    let approaching_deadline = active_orders
        .iter()
        .filter(|o| {
            o.delivery_date
                .is_some_and(|due| due >= today && due <= horizon)
        })
        .count() as u64;

    let overdue_orders = active_orders
        .iter()
        .filter(|o| o.delivery_date.is_some_and(|due| due < today))
        .count() as u64;

    TimelineAlertsSection {
        same_day_orders,
        approaching_deadline,
        overdue_orders,
    }
}

pub fn shape_timeline_detail(
    active_orders: &[order::Model],
    delivered_today: &[order::Model],
    now: DateTime<Utc>,
) -> TimelineAlertsDetail {
    let today = now.date_naive();
    let horizon = today + Duration::days(APPROACHING_WINDOW_DAYS);
    let summary = shape_timeline_alerts(active_orders, delivered_today, now);

    let mut due_today = Vec::new();
    let mut approaching = Vec::new();
    let mut overdue = Vec::new();
    for o in active_orders {
        let Some(due) = o.delivery_date else { continue };
        let row = TimelineAlertRow {
            order_id: o.id,
            order_number: o.order_number.clone(),
            status: o.status.clone(),
            delivery_date: due.format("%Y-%m-%d").to_string(),
            days_remaining: (due - today).num_days(),
        };
        if due < today {
            overdue.push(row);
        } else if due == today {
            due_today.push(row);
        } else if due <= horizon {
            approaching.push(row);
        }
    }
    for bucket in [&mut due_today, &mut approaching, &mut overdue] {
        bucket.sort_by(|a, b| {
            a.delivery_date
                .cmp(&b.delivery_date)
                .then_with(|| a.order_number.cmp(&b.order_number))
        });
    }

    TimelineAlertsDetail {
        summary,
        due_today,
        approaching,
        overdue,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{at, order};
    use super::*;
    use chrono::NaiveDate;

    fn due(status: &str, year: i32, month: u32, day: u32) -> order::Model {
        let mut o = order(status, at(2025, 6, 1, 9));
        o.delivery_date = NaiveDate::from_ymd_opt(year, month, day);
        o
    }

    #[test]
    fn approaching_window_is_inclusive_of_both_ends() {
        let now = at(2025, 6, 10, 12);
        let active = vec![
            due("casting", 2025, 6, 10),
            due("casting", 2025, 6, 13),
            due("casting", 2025, 6, 14),
        ];

        let alerts = shape_timeline_alerts(&active, &[], now);
        assert_eq!(alerts.approaching_deadline, 2);
        assert_eq!(alerts.overdue_orders, 0);
    }

    #[test]
    fn overdue_counts_past_due_dates_only() {
        let now = at(2025, 6, 10, 12);
        let active = vec![
            due("ready", 2025, 6, 9),
            due("ready", 2025, 5, 30),
            due("ready", 2025, 6, 10),
            order("ready", at(2025, 6, 1, 9)),
        ];

        let alerts = shape_timeline_alerts(&active, &[], now);
        assert_eq!(alerts.overdue_orders, 2);
    }

    #[test]
    fn same_day_requires_created_and_finished_today() {
        let now = at(2025, 6, 10, 18);
        let mut rush = order("delivered", at(2025, 6, 10, 9));
        rush.updated_at = at(2025, 6, 10, 16);
        let mut ordinary = order("delivered", at(2025, 6, 2, 9));
        ordinary.updated_at = at(2025, 6, 10, 16);

        let alerts = shape_timeline_alerts(&[], &[rush, ordinary], now);
        assert_eq!(alerts.same_day_orders, 1);
    }

    #[test]
    fn no_alerts_without_orders() {
        let alerts = shape_timeline_alerts(&[], &[], at(2025, 6, 10, 12));
        assert_eq!(alerts.same_day_orders, 0);
        assert_eq!(alerts.approaching_deadline, 0);
        assert_eq!(alerts.overdue_orders, 0);
    }

    #[test]
    fn detail_rows_partition_by_urgency() {
        let now = at(2025, 6, 10, 12);
        let active = vec![
            due("ready", 2025, 6, 10),
            due("casting", 2025, 6, 12),
            due("casting", 2025, 6, 13),
            due("new", 2025, 6, 14),
            due("ready", 2025, 6, 8),
            order("ready", at(2025, 6, 1, 9)),
        ];

        let detail = shape_timeline_detail(&active, &[], now);
        assert_eq!(detail.due_today.len(), 1);
        assert_eq!(detail.due_today[0].days_remaining, 0);
        assert_eq!(detail.approaching.len(), 2);
        assert_eq!(detail.approaching[0].delivery_date, "2025-06-12");
        assert_eq!(detail.overdue.len(), 1);
        assert_eq!(detail.overdue[0].days_remaining, -2);
        // summary keeps the card semantics: approaching includes today
        assert_eq!(detail.summary.approaching_deadline, 3);
        assert_eq!(detail.summary.overdue_orders, 1);
    }

    #[test]
    fn detail_rows_sort_by_deadline_then_number() {
        let now = at(2025, 6, 10, 12);
        let mut early = due("casting", 2025, 6, 11);
        early.order_number = "ORDB".into();
        let mut late = due("casting", 2025, 6, 12);
        late.order_number = "ORDA".into();
        let mut tied = due("casting", 2025, 6, 11);
        tied.order_number = "ORDA".into();

        let detail = shape_timeline_detail(&[early, late, tied], &[], now);
        let numbers: Vec<&str> = detail
            .approaching
            .iter()
            .map(|r| r.order_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["ORDA", "ORDB", "ORDA"]);
        assert_eq!(detail.approaching[2].delivery_date, "2025-06-12");
    }
}
