//! Message and support-ticket analytics.
//!
//! Response times pair each run of customer messages with the first admin
//! reply that follows it inside the same order thread.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::rows;
use super::ReportMeta;
use crate::domain::{ContactMethod, ContactStatus, OrderStatus, SenderType};
use crate::entities::{contact_ticket, message, order};
use crate::services::analytics::buckets;
use crate::services::analytics::metrics;

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BySenderType {
    pub user: u64,
    pub admin: u64,
    pub system: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscussedOrderEntry {
    pub order_id: Uuid,
    pub order_number: String,
    pub message_count: u64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageAnalyticsSection {
    pub total_messages: u64,
    pub unread_count: u64,
    pub avg_response_time_hours: f64,
    pub response_rate: f64,
    pub by_sender_type: BySenderType,
    pub messages_per_order: f64,
    pub most_discussed_orders: Vec<DiscussedOrderEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketStatusEntry {
    pub status: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactMethodEntry {
    pub method: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketOriginSplit {
    pub order_related: u64,
    pub general: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActiveDayEntry {
    pub day: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SupportTicketsSection {
    pub total_tickets: u64,
    pub by_status: Vec<TicketStatusEntry>,
    pub open_tickets: u64,
    pub resolution_rate: f64,
    pub avg_resolution_time_hours: f64,
    pub by_contact_method: Vec<ContactMethodEntry>,
    pub order_related_vs_general: TicketOriginSplit,
    pub unanswered_tickets: u64,
    pub most_active_days: Vec<ActiveDayEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommunicationSection {
    pub messages: MessageAnalyticsSection,
    pub support_tickets: SupportTicketsSection,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommunicationReport {
    pub communication_analytics: CommunicationSection,
    pub meta: ReportMeta,
}

/// Share of tickets that reached a settled status. Also feeds the KPI strip.
pub(crate) fn settled_rate(tickets: &[contact_ticket::Model]) -> f64 {
    let settled = tickets
        .iter()
        .filter(|t| {
            t.status
                .parse::<ContactStatus>()
                .is_ok_and(ContactStatus::is_settled)
        })
        .count() as u64;
    metrics::percentage(settled, tickets.len() as u64)
}

pub fn shape_communication(
    messages: &[message::Model],
    tickets: &[contact_ticket::Model],
    order_lookup: &HashMap<Uuid, order::Model>,
) -> CommunicationSection {
    CommunicationSection {
        messages: shape_messages(messages, order_lookup),
        support_tickets: shape_tickets(tickets),
    }
}

pub(crate) fn sender_breakdown(messages: &[message::Model]) -> BySenderType {
    let mut by_sender_type = BySenderType::default();
    for message in messages {
        match message.sender_type.parse::<SenderType>() {
            Ok(SenderType::User) => by_sender_type.user += 1,
            Ok(SenderType::Admin) => by_sender_type.admin += 1,
            Ok(SenderType::System) => by_sender_type.system += 1,
            Err(_) => {}
        }
    }
    by_sender_type
}

fn shape_messages(
    messages: &[message::Model],
    order_lookup: &HashMap<Uuid, order::Model>,
) -> MessageAnalyticsSection {
    let total = messages.len() as u64;
    let unread = messages.iter().filter(|m| !m.is_read).count() as u64;
    let by_sender_type = sender_breakdown(messages);

    let (avg_response_time_hours, response_rate) = response_metrics(messages);

    let per_order_counts = buckets::counts_by_key(messages.iter().map(|m| m.order_id));
    let distinct_orders = per_order_counts.len() as u64;
    let messages_per_order = if distinct_orders == 0 {
        0.0
    } else {
        metrics::round2(total as f64 / distinct_orders as f64)
    };

    let most_discussed_orders = buckets::top_n(per_order_counts.into_iter().collect(), 5)
        .into_iter()
        .map(|(order_id, message_count)| {
            let (order_number, status) = match order_lookup.get(&order_id) {
                Some(order) => (
                    order.order_number.clone(),
                    discussion_status(rows::status_of(order)),
                ),
                None => ("unknown".to_string(), "active".to_string()),
            };
            DiscussedOrderEntry {
                order_id,
                order_number,
                message_count,
                status,
            }
        })
        .collect();

    MessageAnalyticsSection {
        total_messages: total,
        unread_count: unread,
        avg_response_time_hours,
        response_rate,
        by_sender_type,
        messages_per_order,
        most_discussed_orders,
    }
}

fn discussion_status(status: Option<OrderStatus>) -> String {
    match status {
        Some(OrderStatus::Delivered) => "resolved".to_string(),
        _ => "active".to_string(),
    }
}

/// Walks each order thread chronologically. A run of consecutive customer
/// messages opens one turn; the first admin reply closes it and contributes
/// one response-time sample.
fn response_metrics(messages: &[message::Model]) -> (f64, f64) {
    let mut threads: HashMap<Uuid, Vec<&message::Model>> = HashMap::new();
    for message in messages {
        threads.entry(message.order_id).or_default().push(message);
    }

    let mut samples = Vec::new();
    let mut turns = 0u64;
    let mut answered = 0u64;
    for thread in threads.values_mut() {
        thread.sort_by_key(|m| m.created_at);
        let mut pending_since = None;
        for message in thread.iter() {
            match message.sender_type.parse::<SenderType>() {
                Ok(SenderType::User) => {
                    if pending_since.is_none() {
                        pending_since = Some(message.created_at);
                        turns += 1;
                    }
                }
                Ok(SenderType::Admin) => {
                    if let Some(since) = pending_since.take() {
                        samples.push(metrics::duration_hours(message.created_at - since));
                        answered += 1;
                    }
                }
                _ => {}
            }
        }
    }

    (metrics::safe_avg(&samples), metrics::percentage(answered, turns))
}

fn shape_tickets(tickets: &[contact_ticket::Model]) -> SupportTicketsSection {
    let total = tickets.len() as u64;

    let by_status =
        buckets::enum_counts(tickets.iter().filter_map(|t| t.status.parse::<ContactStatus>().ok()))
            .into_iter()
            .map(|(status, count)| TicketStatusEntry {
                status: status.to_string(),
                count,
                percentage: metrics::percentage(count, total),
            })
            .collect();

    let open_tickets = tickets
        .iter()
        .filter(|t| {
            t.status
                .parse::<ContactStatus>()
                .is_ok_and(ContactStatus::is_open)
        })
        .count() as u64;

    let resolution_samples: Vec<f64> = tickets
        .iter()
        .filter_map(|t| t.responded_at.map(|at| at - t.created_at))
        .map(metrics::duration_hours)
        .collect();

    let by_contact_method = buckets::enum_counts(
        tickets
            .iter()
            .filter_map(|t| t.contact_method.parse::<ContactMethod>().ok()),
    )
    .into_iter()
    .map(|(method, count)| ContactMethodEntry {
        method: method.to_string(),
        count,
    })
    .collect();

    let order_related = tickets.iter().filter(|t| t.order_number.is_some()).count() as u64;
    let unanswered_tickets = tickets.iter().filter(|t| t.admin_response.is_none()).count() as u64;

    let day_counts = buckets::counts_by_key(tickets.iter().map(|t| t.created_at.date_naive()));
    let most_active_days = buckets::top_n(day_counts.into_iter().collect(), 7)
        .into_iter()
        .map(|(day, count)| ActiveDayEntry {
            day: day.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect();

    SupportTicketsSection {
        total_tickets: total,
        by_status,
        open_tickets,
        resolution_rate: settled_rate(tickets),
        avg_resolution_time_hours: metrics::safe_avg(&resolution_samples),
        by_contact_method,
        order_related_vs_general: TicketOriginSplit {
            order_related,
            general: total - order_related,
        },
        unanswered_tickets,
        most_active_days,
    }
}
