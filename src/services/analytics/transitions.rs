//! Reconstruction of per-stage timings from the order audit trail.
//!
//! Stage durations are not stored anywhere; they are rebuilt by walking each
//! order's `status_change` log rows in time order. The walk starts at the
//! order's creation in `new`. A change whose `from` matches the tracked
//! status and whose `to` is the direct pipeline successor contributes one
//! sample: the stay in `from`. Direct jumps and declines contribute nothing
//! but still advance the walk, and an inconsistent record resynchronizes it,
//! so one corrupt row never poisons the rest of an order's trail.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;
use uuid::Uuid;

use super::metrics;
use crate::domain::OrderStatus;
use crate::entities::order_log;

/// A parsed status-change audit record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusChange {
    pub order_id: Uuid,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub at: DateTime<Utc>,
}

impl StatusChange {
    /// Parses an audit row. Returns `None` for non-transition actions and for
    /// rows carrying a status the pipeline does not know about.
    pub fn from_log(log: &order_log::Model) -> Option<StatusChange> {
        if log.action != order_log::actions::STATUS_CHANGE {
            return None;
        }
        let from = OrderStatus::parse(log.from_status.as_deref()?)?;
        let to = OrderStatus::parse(log.to_status.as_deref()?)?;
        Some(StatusChange {
            order_id: log.order_id,
            from,
            to,
            at: log.created_at,
        })
    }
}

/// One step of the production pipeline, with the service-level target used
/// to grade its average turnaround.
#[derive(Debug, Clone, Copy)]
pub struct StageSpec {
    pub name: &'static str,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub target_days: f64,
}

/// The seven stages between adjacent pipeline statuses.
pub const STAGES: [StageSpec; 7] = [
    StageSpec {
        name: "confirmation",
        from: OrderStatus::New,
        to: OrderStatus::Confirmed,
        target_days: 1.0,
    },
    StageSpec {
        name: "cad_design",
        from: OrderStatus::Confirmed,
        to: OrderStatus::CadDone,
        target_days: 3.0,
    },
    StageSpec {
        name: "design_approval",
        from: OrderStatus::CadDone,
        to: OrderStatus::UserConfirmed,
        target_days: 2.0,
    },
    StageSpec {
        name: "rpt_production",
        from: OrderStatus::UserConfirmed,
        to: OrderStatus::RptDone,
        target_days: 3.0,
    },
    StageSpec {
        name: "casting",
        from: OrderStatus::RptDone,
        to: OrderStatus::Casting,
        target_days: 4.0,
    },
    StageSpec {
        name: "finishing",
        from: OrderStatus::Casting,
        to: OrderStatus::Ready,
        target_days: 2.0,
    },
    StageSpec {
        name: "delivery",
        from: OrderStatus::Ready,
        to: OrderStatus::Delivered,
        target_days: 2.0,
    },
];

/// Stage timing row for the order analytics report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StagePerformanceRow {
    pub stage: String,
    pub from_status: String,
    pub to_status: String,
    pub avg_time_days: f64,
    pub avg_time_label: String,
    pub sample_count: u64,
    pub status: String,
}

/// Days spent in each adjacent stage, keyed by `(from, to)`, reconstructed
/// from `changes` for the orders in `created_at`.
pub fn stage_durations(
    created_at: &HashMap<Uuid, DateTime<Utc>>,
    changes: &[StatusChange],
) -> HashMap<(OrderStatus, OrderStatus), Vec<f64>> {
    let mut samples: HashMap<(OrderStatus, OrderStatus), Vec<f64>> = HashMap::new();

    for (order_id, order_changes) in group_by_order(changes) {
        let mut state = OrderStatus::New;
        let mut entered = created_at.get(&order_id).copied();

        for change in order_changes {
            if change.from == state {
                if let Some(entered_at) = entered {
                    let stay = change.at - entered_at;
                    if stay >= Duration::zero() && state.next() == Some(change.to) {
                        samples
                            .entry((state, change.to))
                            .or_default()
                            .push(metrics::duration_days(stay));
                    }
                }
            }
            state = change.to;
            entered = Some(change.at);
        }
    }

    samples
}

/// Days from creation to the delivered transition, one entry per order whose
/// trail reaches `delivered`.
pub fn completion_days(
    created_at: &HashMap<Uuid, DateTime<Utc>>,
    changes: &[StatusChange],
) -> Vec<f64> {
    let mut days = Vec::new();

    for (order_id, order_changes) in group_by_order(changes) {
        let Some(created) = created_at.get(&order_id).copied() else {
            continue;
        };
        let delivered = order_changes
            .iter()
            .rev()
            .find(|change| change.to == OrderStatus::Delivered);
        if let Some(change) = delivered {
            let elapsed = change.at - created;
            if elapsed >= Duration::zero() {
                days.push(metrics::duration_days(elapsed));
            }
        }
    }

    days
}

/// The full stage table, one row per pipeline stage in order. Stages without
/// samples report zero with a `no_data` grade instead of being omitted.
pub fn stage_performance(
    samples: &HashMap<(OrderStatus, OrderStatus), Vec<f64>>,
) -> Vec<StagePerformanceRow> {
    STAGES
        .iter()
        .map(|spec| {
            let stage_samples = samples
                .get(&(spec.from, spec.to))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let avg = metrics::safe_avg(stage_samples);
            let status = if stage_samples.is_empty() {
                "no_data"
            } else if avg <= spec.target_days {
                "good"
            } else {
                "warning"
            };

            let avg_time_label = if stage_samples.is_empty() {
                "N/A".to_string()
            } else {
                format!("{avg:.1} days")
            };

            StagePerformanceRow {
                stage: spec.name.to_string(),
                from_status: spec.from.to_string(),
                to_status: spec.to.to_string(),
                avg_time_days: avg,
                avg_time_label,
                sample_count: stage_samples.len() as u64,
                status: status.to_string(),
            }
        })
        .collect()
}

/// Changes grouped per order and sorted chronologically. Ordering is
/// deterministic so repeated reconstructions agree.
fn group_by_order(changes: &[StatusChange]) -> BTreeMap<Uuid, Vec<StatusChange>> {
    let mut grouped: BTreeMap<Uuid, Vec<StatusChange>> = BTreeMap::new();
    for change in changes {
        grouped.entry(change.order_id).or_default().push(*change);
    }
    for order_changes in grouped.values_mut() {
        order_changes.sort_by_key(|change| change.at);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap()
    }

    fn change(order_id: Uuid, from: OrderStatus, to: OrderStatus, when: DateTime<Utc>) -> StatusChange {
        StatusChange {
            order_id,
            from,
            to,
            at: when,
        }
    }

    #[test]
    fn consecutive_transitions_yield_stage_samples() {
        let id = Uuid::new_v4();
        let created: HashMap<_, _> = [(id, at(1, 0))].into();
        let changes = vec![
            change(id, OrderStatus::New, OrderStatus::Confirmed, at(2, 0)),
            change(id, OrderStatus::Confirmed, OrderStatus::CadDone, at(4, 0)),
        ];

        let samples = stage_durations(&created, &changes);

        assert_eq!(
            samples[&(OrderStatus::New, OrderStatus::Confirmed)],
            vec![1.0]
        );
        assert_eq!(
            samples[&(OrderStatus::Confirmed, OrderStatus::CadDone)],
            vec![2.0]
        );
    }

    #[test]
    fn direct_jumps_are_excluded_but_later_stages_still_measure() {
        let id = Uuid::new_v4();
        let created: HashMap<_, _> = [(id, at(1, 0))].into();
        let changes = vec![
            change(id, OrderStatus::New, OrderStatus::CadDone, at(2, 0)),
            change(id, OrderStatus::CadDone, OrderStatus::UserConfirmed, at(3, 0)),
        ];

        let samples = stage_durations(&created, &changes);

        assert!(!samples.contains_key(&(OrderStatus::New, OrderStatus::Confirmed)));
        assert!(!samples.contains_key(&(OrderStatus::Confirmed, OrderStatus::CadDone)));
        assert_eq!(
            samples[&(OrderStatus::CadDone, OrderStatus::UserConfirmed)],
            vec![1.0]
        );
    }

    #[test]
    fn declines_contribute_no_samples() {
        let id = Uuid::new_v4();
        let created: HashMap<_, _> = [(id, at(1, 0))].into();
        let changes = vec![
            change(id, OrderStatus::New, OrderStatus::Confirmed, at(2, 0)),
            change(id, OrderStatus::Confirmed, OrderStatus::Declined, at(3, 0)),
        ];

        let samples = stage_durations(&created, &changes);

        assert_eq!(samples.len(), 1);
        assert_eq!(
            samples[&(OrderStatus::New, OrderStatus::Confirmed)],
            vec![1.0]
        );
    }

    #[test]
    fn inconsistent_records_resynchronize_the_walk() {
        let id = Uuid::new_v4();
        let created: HashMap<_, _> = [(id, at(1, 0))].into();
        // The first record claims the order was already confirmed; the walk
        // takes no sample from it but trusts its destination.
        let changes = vec![
            change(id, OrderStatus::Confirmed, OrderStatus::CadDone, at(2, 0)),
            change(id, OrderStatus::CadDone, OrderStatus::UserConfirmed, at(5, 0)),
        ];

        let samples = stage_durations(&created, &changes);

        assert!(!samples.contains_key(&(OrderStatus::Confirmed, OrderStatus::CadDone)));
        assert_eq!(
            samples[&(OrderStatus::CadDone, OrderStatus::UserConfirmed)],
            vec![3.0]
        );
    }

    #[test]
    fn orders_are_walked_independently() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let created: HashMap<_, _> = [(a, at(1, 0)), (b, at(1, 0))].into();
        // Interleaved input across two orders, deliberately out of time order.
        let changes = vec![
            change(b, OrderStatus::Confirmed, OrderStatus::CadDone, at(6, 0)),
            change(a, OrderStatus::New, OrderStatus::Confirmed, at(3, 0)),
            change(b, OrderStatus::New, OrderStatus::Confirmed, at(2, 0)),
        ];

        let samples = stage_durations(&created, &changes);

        let confirmation = &samples[&(OrderStatus::New, OrderStatus::Confirmed)];
        assert_eq!(confirmation.len(), 2);
        assert!(confirmation.contains(&2.0) && confirmation.contains(&1.0));
        assert_eq!(
            samples[&(OrderStatus::Confirmed, OrderStatus::CadDone)],
            vec![4.0]
        );
    }

    #[test]
    fn completion_days_need_a_delivered_transition() {
        let done = Uuid::new_v4();
        let open = Uuid::new_v4();
        let created: HashMap<_, _> = [(done, at(1, 0)), (open, at(1, 0))].into();
        let changes = vec![
            change(done, OrderStatus::Ready, OrderStatus::Delivered, at(8, 12)),
            change(open, OrderStatus::New, OrderStatus::Confirmed, at(2, 0)),
        ];

        let days = completion_days(&created, &changes);

        assert_eq!(days, vec![7.5]);
    }

    #[test]
    fn stage_performance_reports_every_stage() {
        let id = Uuid::new_v4();
        let created: HashMap<_, _> = [(id, at(1, 0))].into();
        let changes = vec![change(
            id,
            OrderStatus::New,
            OrderStatus::Confirmed,
            at(6, 0),
        )];

        let rows = stage_performance(&stage_durations(&created, &changes));

        assert_eq!(rows.len(), STAGES.len());
        let confirmation = &rows[0];
        assert_eq!(confirmation.stage, "confirmation");
        assert_eq!(confirmation.avg_time_days, 5.0);
        assert_eq!(confirmation.avg_time_label, "5.0 days");
        assert_eq!(confirmation.sample_count, 1);
        // Five days against a one-day target.
        assert_eq!(confirmation.status, "warning");

        let casting = rows.iter().find(|r| r.stage == "casting").unwrap();
        assert_eq!(casting.sample_count, 0);
        assert_eq!(casting.avg_time_days, 0.0);
        assert_eq!(casting.avg_time_label, "N/A");
        assert_eq!(casting.status, "no_data");
    }

    #[test]
    fn from_log_filters_non_transition_rows() {
        let base = order_log::Model {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            admin_id: None,
            action: order_log::actions::STATUS_CHANGE.to_string(),
            from_status: Some("new".to_string()),
            to_status: Some("confirmed".to_string()),
            note: None,
            created_at: at(1, 0),
        };

        assert!(StatusChange::from_log(&base).is_some());

        let upload = order_log::Model {
            action: order_log::actions::FILE_UPLOAD.to_string(),
            ..base.clone()
        };
        assert!(StatusChange::from_log(&upload).is_none());

        let unknown_status = order_log::Model {
            to_status: Some("shipped".to_string()),
            ..base.clone()
        };
        assert!(StatusChange::from_log(&unknown_status).is_none());

        let missing_from = order_log::Model {
            from_status: None,
            ..base
        };
        assert!(StatusChange::from_log(&missing_from).is_none());
    }
}
