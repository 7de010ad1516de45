//! Report assemblers and their response shapes.
//!
//! Each submodule owns one report section: a set of serializable rows plus a
//! pure shaping function that turns preloaded entity slices into the section.
//! The assemblers never do their own date arithmetic or percentage math; that
//! lives in `period`, `metrics`, `buckets` and `transitions`.

pub mod alerts;
pub mod communication;
pub mod customers;
pub mod dashboard;
pub mod kpi;
pub mod news;
pub mod operational;
pub mod orders;
pub mod trends;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::period::{DateRange, ResolvedPeriod};

/// Window echoed back in report metadata.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetaRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&DateRange> for MetaRange {
    fn from(range: &DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

/// Attached to every report payload: when it was generated, which filter was
/// actually applied (an unknown keyword shows the default it fell back to),
/// and the resolved window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportMeta {
    pub generated_at: DateTime<Utc>,
    pub time_filter: String,
    pub date_range: MetaRange,
    pub timezone: String,
}

impl ReportMeta {
    pub fn new(resolved: &ResolvedPeriod, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            time_filter: resolved.applied_filter.clone(),
            date_range: MetaRange::from(&resolved.range),
            timezone: "UTC".to_string(),
        }
    }
}

/// Everything at once: the payload of `GET /api/v1/analytics/full`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FullAnalysisReport {
    pub kpi: kpi::KpiSection,
    pub order_analytics: orders::OrderAnalyticsSection,
    pub customer_analytics: customers::CustomerAnalyticsSection,
    pub communication_analytics: communication::CommunicationSection,
    pub news_engagement: news::NewsEngagementSection,
    pub time_trends: trends::TimeTrendsSection,
    pub operational_insights: operational::OperationalSection,
    pub meta: ReportMeta,
}

pub(crate) mod rows {
    //! Small row-level helpers shared by several assemblers.

    use rust_decimal::Decimal;
    use std::collections::HashSet;

    use crate::domain::OrderStatus;
    use crate::entities::order;

    /// Fail-soft status of a stored order row.
    pub fn status_of(order: &order::Model) -> Option<OrderStatus> {
        OrderStatus::parse(&order.status)
    }

    pub fn count_status(orders: &[order::Model], status: OrderStatus) -> u64 {
        orders
            .iter()
            .filter(|o| status_of(o) == Some(status))
            .count() as u64
    }

    pub fn distinct_customers(orders: &[order::Model]) -> u64 {
        orders
            .iter()
            .map(|o| o.customer_id)
            .collect::<HashSet<_>>()
            .len() as u64
    }

    /// Sum of estimated values across delivered orders.
    pub fn delivered_revenue(orders: &[order::Model]) -> Decimal {
        orders
            .iter()
            .filter(|o| status_of(o) == Some(OrderStatus::Delivered))
            .filter_map(|o| o.estimated_value)
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Entity constructors for assembler tests. Every field gets a sensible
    //! default; tests override what they assert on.

    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::entities::{contact_ticket, customer, message, news_item, order, order_log};

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    pub fn order(status: &str, created_at: DateTime<Utc>) -> order::Model {
        order::Model {
            id: Uuid::new_v4(),
            order_number: format!("ORD{}", &Uuid::new_v4().simple().to_string()[..10]),
            customer_id: Uuid::new_v4(),
            status: status.to_string(),
            description: None,
            gold_color: None,
            gold_weight: None,
            diamond_size: None,
            special_requirements: None,
            estimated_value: None,
            delivery_date: None,
            declined_reason: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn valued_order(status: &str, created_at: DateTime<Utc>, value: Decimal) -> order::Model {
        order::Model {
            estimated_value: Some(value),
            ..order(status, created_at)
        }
    }

    pub fn customer(name: &str, is_admin: bool, created_at: DateTime<Utc>) -> customer::Model {
        customer::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            is_admin,
            is_active: true,
            created_at,
        }
    }

    pub fn message(
        order_id: Uuid,
        sender_type: &str,
        created_at: DateTime<Utc>,
    ) -> message::Model {
        message::Model {
            id: Uuid::new_v4(),
            order_id,
            sender_id: Some(Uuid::new_v4()),
            sender_type: sender_type.to_string(),
            content: "hello".to_string(),
            is_read: true,
            created_at,
        }
    }

    pub fn ticket(status: &str, created_at: DateTime<Utc>) -> contact_ticket::Model {
        contact_ticket::Model {
            id: Uuid::new_v4(),
            customer_id: None,
            name: "Guest".to_string(),
            email: "guest@example.com".to_string(),
            phone: None,
            contact_method: "email".to_string(),
            subject: "question".to_string(),
            message: "hello".to_string(),
            order_number: None,
            status: status.to_string(),
            admin_response: None,
            responded_by: None,
            responded_at: None,
            created_at,
        }
    }

    pub fn news(category: &str, priority: &str, published_at: DateTime<Utc>) -> news_item::Model {
        news_item::Model {
            id: Uuid::new_v4(),
            title: "Spring collection".to_string(),
            body: "...".to_string(),
            category: category.to_string(),
            priority: priority.to_string(),
            is_public: true,
            is_auto_generated: false,
            read_count: 0,
            click_count: 0,
            created_by: None,
            published_at,
            expires_at: None,
        }
    }

    pub fn log(order_id: Uuid, action: &str, created_at: DateTime<Utc>) -> order_log::Model {
        order_log::Model {
            id: Uuid::new_v4(),
            order_id,
            admin_id: None,
            action: action.to_string(),
            from_status: None,
            to_status: None,
            note: None,
            created_at,
        }
    }
}
