//! Time-windowed reporting over the live order, messaging, support and news
//! tables.
//!
//! The split here is deliberate: `period`, `metrics`, `buckets` and
//! `transitions` are pure and synchronous, the shaping code in `reports`
//! works on preloaded rows, and only [`AnalyticsService`] touches the
//! database. Every report method resolves the requested window first, loads
//! the slices it needs, and hands them to a shaping function.

pub mod buckets;
pub mod metrics;
pub mod period;
pub mod reports;
pub mod transitions;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    domain::{ContactStatus, OrderStatus},
    entities::{
        contact_ticket::{Column as TicketColumn, Entity as TicketEntity},
        customer::{Column as CustomerColumn, Entity as CustomerEntity},
        message::{Column as MessageColumn, Entity as MessageEntity},
        news_item::{Column as NewsColumn, Entity as NewsEntity},
        order::{Column as OrderColumn, Entity as OrderEntity},
        order_file::{Column as FileColumn, Entity as FileEntity},
        order_log::{actions, Column as LogColumn, Entity as LogEntity},
    },
    errors::ServiceError,
};

use crate::entities::{contact_ticket, customer, message, news_item, order, order_file, order_log};

use period::{DateRange, ResolvedPeriod};
use reports::customers::CustomerOrderStats;
use reports::{
    alerts, communication, customers, dashboard, kpi, news, operational, orders, trends,
    FullAnalysisReport, ReportMeta,
};
use transitions::StatusChange;

/// Chunk size for id lists in audit-trail and order lookups.
const STATUS_BATCH: usize = 500;
/// Months covered by the monthly volume series.
const VOLUME_MONTHS: usize = 12;
/// Months shown in the growth strip of the trends report.
const GROWTH_MONTHS: usize = 6;
/// Quarters shown next to the monthly growth strip.
const GROWTH_QUARTERS: usize = 4;
/// How many rows the dashboard's recent-orders card shows.
const RECENT_ORDERS_LIMIT: u64 = 6;

/// Window parameters accepted by every report endpoint.
///
/// `time_filter` is the legacy alias some dashboard clients still send;
/// `period` wins when both are present. An explicit `start_date`/`end_date`
/// pair is only consulted when no keyword matched.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PeriodQuery {
    pub period: Option<String>,
    pub time_filter: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl PeriodQuery {
    fn keyword(&self) -> Option<&str> {
        self.period.as_deref().or(self.time_filter.as_deref())
    }

    pub fn resolve(&self, now: DateTime<Utc>) -> Result<ResolvedPeriod, ServiceError> {
        period::resolve_period(
            self.keyword(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            now,
        )
    }
}

/// Read-only reporting facade over the operational tables.
#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DatabaseConnection>,
    revenue_target: f64,
}

impl AnalyticsService {
    pub fn new(db: Arc<DatabaseConnection>, revenue_target: f64) -> Self {
        Self { db, revenue_target }
    }

    /// The admin landing page payload: overview cards, status distribution,
    /// a seven-day trend strip, recent orders, today's deliveries and alerts.
    #[instrument(skip(self, query))]
    pub async fn get_dashboard(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<dashboard::DashboardReport, ServiceError> {
        let resolved = query.resolve(now)?;
        let range = resolved.range;
        let previous = period::previous_period(&range);

        let orders = self.orders_between(&range).await?;
        let prev_orders = self.orders_between(&previous).await?;
        let recent_orders = self.recent_orders(RECENT_ORDERS_LIMIT).await?;
        let deliveries_today = self.deliveries_on(now).await?;
        let active_orders = self.active_orders().await?;
        let new_orders_total = self.count_orders_with_status(OrderStatus::New).await?;
        let messages = self.messages_between(&range).await?;
        let tickets = self.tickets_between(&range).await?;
        let pending_tickets = self
            .count_tickets_with(&[ContactStatus::New, ContactStatus::InProgress])
            .await?;
        let resolved_tickets = self
            .count_tickets_with(&[ContactStatus::Resolved, ContactStatus::Closed])
            .await?;

        let inputs = dashboard::DashboardInputs {
            orders: &orders,
            prev_orders: &prev_orders,
            recent_orders: &recent_orders,
            deliveries_today: &deliveries_today,
            active_orders: &active_orders,
            new_orders_total,
            messages: &messages,
            tickets: &tickets,
            pending_tickets,
            resolved_tickets,
            revenue_target: self.revenue_target,
        };

        Ok(dashboard::DashboardReport {
            dashboard: dashboard::shape_dashboard(&inputs, &range, now),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// KPI cards with change-against-previous-window figures.
    #[instrument(skip(self, query))]
    pub async fn get_kpi(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<kpi::KpiReport, ServiceError> {
        let resolved = query.resolve(now)?;
        let previous = period::previous_period(&resolved.range);

        let orders = self.orders_between(&resolved.range).await?;
        let prev_orders = self.orders_between(&previous).await?;
        let tickets = self.tickets_between(&resolved.range).await?;
        let prev_tickets = self.tickets_between(&previous).await?;
        let (_, completion_days) = self.stage_data_for(&orders).await?;
        let (_, prev_completion_days) = self.stage_data_for(&prev_orders).await?;

        let inputs = kpi::KpiInputs {
            orders: &orders,
            prev_orders: &prev_orders,
            tickets: &tickets,
            prev_tickets: &prev_tickets,
            completion_days: &completion_days,
            prev_completion_days: &prev_completion_days,
        };

        Ok(kpi::KpiReport {
            kpi: kpi::shape_kpi(&inputs),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Order analytics: status groups, stage timing, product preferences,
    /// file activity and the timeline alert counts.
    #[instrument(skip(self, query))]
    pub async fn get_order_analytics(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<orders::OrderAnalyticsReport, ServiceError> {
        let resolved = query.resolve(now)?;

        let window_orders = self.orders_between(&resolved.range).await?;
        let files = self.files_between(&resolved.range).await?;
        let (durations, _) = self.stage_data_for(&window_orders).await?;
        let stage_rows = transitions::stage_performance(&durations);

        let active_orders = self.active_orders().await?;
        let delivered_today = self.delivered_today(now).await?;
        let timeline = alerts::shape_timeline_alerts(&active_orders, &delivered_today, now);

        Ok(orders::OrderAnalyticsReport {
            order_analytics: orders::shape_order_analytics(
                &window_orders,
                &files,
                stage_rows,
                timeline,
            ),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Customer analytics: user base, engagement, top customers, behavior.
    #[instrument(skip(self, query))]
    pub async fn get_customer_analytics(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<customers::CustomerAnalyticsReport, ServiceError> {
        let resolved = query.resolve(now)?;

        let accounts = self.customers_all().await?;
        let stats = self.customer_order_stats().await?;
        let period_orders = self.orders_between(&resolved.range).await?;

        Ok(customers::CustomerAnalyticsReport {
            customer_analytics: customers::shape_customer_analytics(
                &accounts,
                &stats,
                &period_orders,
                &resolved.range,
                now,
            ),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Message threads and support tickets for the window.
    #[instrument(skip(self, query))]
    pub async fn get_communication_analytics(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<communication::CommunicationReport, ServiceError> {
        let resolved = query.resolve(now)?;

        let messages = self.messages_between(&resolved.range).await?;
        let tickets = self.tickets_between(&resolved.range).await?;
        let order_ids: Vec<Uuid> = messages
            .iter()
            .map(|m| m.order_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let order_lookup = self.orders_by_ids(&order_ids).await?;

        Ok(communication::CommunicationReport {
            communication_analytics: communication::shape_communication(
                &messages,
                &tickets,
                &order_lookup,
            ),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// News engagement for items published inside the window.
    #[instrument(skip(self, query))]
    pub async fn get_news_engagement(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<news::NewsEngagementReport, ServiceError> {
        let resolved = query.resolve(now)?;

        let items = self.news_between(&resolved.range).await?;
        let total_customers = self.count_regular_customers().await?;

        Ok(news::NewsEngagementReport {
            news_engagement: news::shape_news_engagement(&items, total_customers, now),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Daily series, weekly summary, monthly growth strip and peak activity.
    #[instrument(skip(self, query))]
    pub async fn get_time_trends(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<trends::TimeTrendsReport, ServiceError> {
        let resolved = query.resolve(now)?;

        let window_orders = self.orders_between(&resolved.range).await?;
        let trailing = self.trailing_month_counts(now, GROWTH_MONTHS).await?;

        Ok(trends::TimeTrendsReport {
            time_trends: trends::shape_time_trends(&window_orders, &resolved.range, &trailing),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Month-over-month and quarter-over-quarter growth, trailing from `now`.
    #[instrument(skip(self, query))]
    pub async fn get_monthly_growth(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<trends::MonthlyGrowthReport, ServiceError> {
        let resolved = query.resolve(now)?;

        let months = self.trailing_month_counts(now, GROWTH_MONTHS).await?;
        let quarters = self.trailing_quarter_counts(now, GROWTH_QUARTERS).await?;

        Ok(trends::MonthlyGrowthReport {
            months: trends::shape_monthly_growth(&months),
            quarterly: trends::shape_quarterly(&quarters),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Dense per-day order counts for the resolved window.
    #[instrument(skip(self, query))]
    pub async fn get_daily_volume(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<trends::DailyVolumeReport, ServiceError> {
        let resolved = query.resolve(now)?;
        let window_orders = self.orders_between(&resolved.range).await?;

        Ok(trends::DailyVolumeReport {
            series: trends::shape_daily_volume(&window_orders, &resolved.range),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Dense per-month order counts for the trailing twelve months. The
    /// window is fixed, so this endpoint ignores period parameters.
    #[instrument(skip(self))]
    pub async fn get_monthly_volume(
        &self,
        now: DateTime<Utc>,
    ) -> Result<trends::MonthlyVolumeReport, ServiceError> {
        let months = buckets::trailing_months(now, VOLUME_MONTHS);
        let start = months
            .first()
            .and_then(|&(year, month)| buckets::month_bounds(year, month))
            .map(|bounds| bounds.start)
            .unwrap_or(now);
        let resolved = ResolvedPeriod {
            range: DateRange { start, end: now },
            applied_filter: format!("trailing:{VOLUME_MONTHS}m"),
        };

        let window_orders = self.orders_between(&resolved.range).await?;

        Ok(trends::MonthlyVolumeReport {
            series: trends::shape_monthly_volume(&window_orders, &resolved.range),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Delivery-deadline alerts with per-order rows. The counts are live
    /// snapshots; the window only shows up in the echoed metadata.
    #[instrument(skip(self, query))]
    pub async fn get_timeline_alerts(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<alerts::TimelineAlertsReport, ServiceError> {
        let resolved = query.resolve(now)?;

        let active_orders = self.active_orders().await?;
        let delivered_today = self.delivered_today(now).await?;

        Ok(alerts::TimelineAlertsReport {
            timeline_alerts: alerts::shape_timeline_detail(&active_orders, &delivered_today, now),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    /// Every section in one payload. Shares one set of loaded rows across
    /// sections so the numbers agree with each other.
    #[instrument(skip(self, query))]
    pub async fn get_full_analysis(
        &self,
        query: &PeriodQuery,
        now: DateTime<Utc>,
    ) -> Result<FullAnalysisReport, ServiceError> {
        let resolved = query.resolve(now)?;
        info!(filter = %resolved.applied_filter, "assembling full analysis");
        let range = resolved.range;
        let previous = period::previous_period(&range);

        let window_orders = self.orders_between(&range).await?;
        let prev_orders = self.orders_between(&previous).await?;
        let files = self.files_between(&range).await?;
        let messages = self.messages_between(&range).await?;
        let tickets = self.tickets_between(&range).await?;
        let prev_tickets = self.tickets_between(&previous).await?;
        let accounts = self.customers_all().await?;
        let stats = self.customer_order_stats().await?;
        let news_items = self.news_between(&range).await?;
        let logs = self.order_logs_between(&range).await?;
        let active_orders = self.active_orders().await?;
        let delivered_today = self.delivered_today(now).await?;
        let trailing = self.trailing_month_counts(now, GROWTH_MONTHS).await?;

        let (durations, completion_days) = self.stage_data_for(&window_orders).await?;
        let (_, prev_completion_days) = self.stage_data_for(&prev_orders).await?;
        let stage_rows = transitions::stage_performance(&durations);
        let timeline = alerts::shape_timeline_alerts(&active_orders, &delivered_today, now);

        // One lookup covers both the discussed-orders list and the log rows.
        let order_ids: Vec<Uuid> = messages
            .iter()
            .map(|m| m.order_id)
            .chain(logs.iter().map(|l| l.order_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let order_lookup = self.orders_by_ids(&order_ids).await?;

        let admins: Vec<customer::Model> =
            accounts.iter().filter(|c| c.is_admin).cloned().collect();
        let total_customers = accounts.iter().filter(|c| !c.is_admin).count() as u64;

        let kpi_inputs = kpi::KpiInputs {
            orders: &window_orders,
            prev_orders: &prev_orders,
            tickets: &tickets,
            prev_tickets: &prev_tickets,
            completion_days: &completion_days,
            prev_completion_days: &prev_completion_days,
        };

        Ok(FullAnalysisReport {
            kpi: kpi::shape_kpi(&kpi_inputs),
            order_analytics: orders::shape_order_analytics(
                &window_orders,
                &files,
                stage_rows,
                timeline,
            ),
            customer_analytics: customers::shape_customer_analytics(
                &accounts,
                &stats,
                &window_orders,
                &range,
                now,
            ),
            communication_analytics: communication::shape_communication(
                &messages,
                &tickets,
                &order_lookup,
            ),
            news_engagement: news::shape_news_engagement(&news_items, total_customers, now),
            time_trends: trends::shape_time_trends(&window_orders, &range, &trailing),
            operational_insights: operational::shape_operational(
                &logs,
                &admins,
                &order_lookup,
                &active_orders,
                now,
            ),
            meta: ReportMeta::new(&resolved, now),
        })
    }

    // ---- loaders ----

    async fn orders_between(&self, range: &DateRange) -> Result<Vec<order::Model>, ServiceError> {
        let db = &*self.db;
        let rows = OrderEntity::find()
            .filter(OrderColumn::CreatedAt.between(range.start, range.end))
            .all(db)
            .await?;
        Ok(rows)
    }

    async fn count_orders_between(&self, range: &DateRange) -> Result<u64, ServiceError> {
        let db = &*self.db;
        let count = OrderEntity::find()
            .filter(OrderColumn::CreatedAt.between(range.start, range.end))
            .count(db)
            .await?;
        Ok(count)
    }

    async fn count_orders_with_status(&self, status: OrderStatus) -> Result<u64, ServiceError> {
        let db = &*self.db;
        let count = OrderEntity::find()
            .filter(OrderColumn::Status.eq(status.to_string()))
            .count(db)
            .await?;
        Ok(count)
    }

    /// Orders still moving through the pipeline, terminal statuses excluded.
    async fn active_orders(&self) -> Result<Vec<order::Model>, ServiceError> {
        let db = &*self.db;
        let statuses: Vec<String> = OrderStatus::PIPELINE
            .iter()
            .filter(|s| s.is_active())
            .map(ToString::to_string)
            .collect();
        let rows = OrderEntity::find()
            .filter(OrderColumn::Status.is_in(statuses))
            .all(db)
            .await?;
        Ok(rows)
    }

    async fn recent_orders(
        &self,
        limit: u64,
    ) -> Result<Vec<(order::Model, Option<customer::Model>)>, ServiceError> {
        let db = &*self.db;
        let rows = OrderEntity::find()
            .find_also_related(CustomerEntity)
            .order_by_desc(OrderColumn::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Orders scheduled for delivery today, with their customers.
    async fn deliveries_on(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(order::Model, Option<customer::Model>)>, ServiceError> {
        let db = &*self.db;
        let statuses = [
            OrderStatus::Ready.to_string(),
            OrderStatus::Delivered.to_string(),
        ];
        let rows = OrderEntity::find()
            .find_also_related(CustomerEntity)
            .filter(OrderColumn::DeliveryDate.eq(now.date_naive()))
            .filter(OrderColumn::Status.is_in(statuses))
            .order_by_desc(OrderColumn::UpdatedAt)
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Orders whose status reached delivered today.
    async fn delivered_today(&self, now: DateTime<Utc>) -> Result<Vec<order::Model>, ServiceError> {
        let db = &*self.db;
        let start = period::at_midnight(now.date_naive());
        let rows = OrderEntity::find()
            .filter(OrderColumn::Status.eq(OrderStatus::Delivered.to_string()))
            .filter(OrderColumn::UpdatedAt.between(start, now))
            .all(db)
            .await?;
        Ok(rows)
    }

    async fn customers_all(&self) -> Result<Vec<customer::Model>, ServiceError> {
        let db = &*self.db;
        let rows = CustomerEntity::find().all(db).await?;
        Ok(rows)
    }

    async fn count_regular_customers(&self) -> Result<u64, ServiceError> {
        let db = &*self.db;
        let count = CustomerEntity::find()
            .filter(CustomerColumn::IsAdmin.eq(false))
            .count(db)
            .await?;
        Ok(count)
    }

    /// Lifetime per-customer aggregates, one grouped query for the whole
    /// table instead of a count per account.
    async fn customer_order_stats(&self) -> Result<Vec<CustomerOrderStats>, ServiceError> {
        let db = &*self.db;
        let rows: Vec<(
            Uuid,
            i64,
            Option<rust_decimal::Decimal>,
            Option<DateTime<Utc>>,
            Option<DateTime<Utc>>,
        )> = OrderEntity::find()
            .select_only()
            .column(OrderColumn::CustomerId)
            .column_as(OrderColumn::Id.count(), "order_count")
            .column_as(OrderColumn::EstimatedValue.sum(), "total_value")
            .column_as(OrderColumn::CreatedAt.min(), "first_order_at")
            .column_as(OrderColumn::CreatedAt.max(), "last_order_at")
            .group_by(OrderColumn::CustomerId)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(customer_id, order_count, total_value, first_order_at, last_order_at)| {
                    CustomerOrderStats {
                        customer_id,
                        order_count,
                        total_value,
                        first_order_at,
                        last_order_at,
                    }
                },
            )
            .collect())
    }

    async fn messages_between(
        &self,
        range: &DateRange,
    ) -> Result<Vec<message::Model>, ServiceError> {
        let db = &*self.db;
        let rows = MessageEntity::find()
            .filter(MessageColumn::CreatedAt.between(range.start, range.end))
            .all(db)
            .await?;
        Ok(rows)
    }

    async fn tickets_between(
        &self,
        range: &DateRange,
    ) -> Result<Vec<contact_ticket::Model>, ServiceError> {
        let db = &*self.db;
        let rows = TicketEntity::find()
            .filter(TicketColumn::CreatedAt.between(range.start, range.end))
            .all(db)
            .await?;
        Ok(rows)
    }

    async fn count_tickets_with(&self, statuses: &[ContactStatus]) -> Result<u64, ServiceError> {
        let db = &*self.db;
        let values: Vec<String> = statuses.iter().map(ToString::to_string).collect();
        let count = TicketEntity::find()
            .filter(TicketColumn::Status.is_in(values))
            .count(db)
            .await?;
        Ok(count)
    }

    async fn news_between(&self, range: &DateRange) -> Result<Vec<news_item::Model>, ServiceError> {
        let db = &*self.db;
        let rows = NewsEntity::find()
            .filter(NewsColumn::PublishedAt.between(range.start, range.end))
            .all(db)
            .await?;
        Ok(rows)
    }

    async fn order_logs_between(
        &self,
        range: &DateRange,
    ) -> Result<Vec<order_log::Model>, ServiceError> {
        let db = &*self.db;
        let rows = LogEntity::find()
            .filter(LogColumn::CreatedAt.between(range.start, range.end))
            .all(db)
            .await?;
        Ok(rows)
    }

    async fn files_between(
        &self,
        range: &DateRange,
    ) -> Result<Vec<order_file::Model>, ServiceError> {
        let db = &*self.db;
        let rows = FileEntity::find()
            .filter(FileColumn::UploadedAt.between(range.start, range.end))
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Status-change audit rows for the given orders, chunked so the id
    /// lists stay bounded. Per-order ordering is restored downstream, so
    /// chunk boundaries are harmless.
    async fn status_changes_for(
        &self,
        order_ids: &[Uuid],
    ) -> Result<Vec<StatusChange>, ServiceError> {
        let db = &*self.db;
        let mut changes = Vec::new();
        for chunk in order_ids.chunks(STATUS_BATCH) {
            let logs = LogEntity::find()
                .filter(LogColumn::OrderId.is_in(chunk.iter().copied()))
                .filter(LogColumn::Action.eq(actions::STATUS_CHANGE))
                .order_by_asc(LogColumn::CreatedAt)
                .all(db)
                .await?;
            changes.extend(logs.iter().filter_map(StatusChange::from_log));
        }
        Ok(changes)
    }

    async fn orders_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, order::Model>, ServiceError> {
        let db = &*self.db;
        let mut by_id = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(STATUS_BATCH) {
            let rows = OrderEntity::find()
                .filter(OrderColumn::Id.is_in(chunk.iter().copied()))
                .all(db)
                .await?;
            by_id.extend(rows.into_iter().map(|o| (o.id, o)));
        }
        Ok(by_id)
    }

    /// Reconstructed stage durations and creation-to-delivered times for the
    /// given orders, from one batched audit-trail read.
    async fn stage_data_for(
        &self,
        orders: &[order::Model],
    ) -> Result<
        (
            HashMap<(OrderStatus, OrderStatus), Vec<f64>>,
            Vec<f64>,
        ),
        ServiceError,
    > {
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let changes = self.status_changes_for(&ids).await?;
        let created_at: HashMap<Uuid, DateTime<Utc>> =
            orders.iter().map(|o| (o.id, o.created_at)).collect();

        let durations = transitions::stage_durations(&created_at, &changes);
        let completion = transitions::completion_days(&created_at, &changes);
        Ok((durations, completion))
    }

    /// Order counts for the trailing `n` calendar months, oldest first.
    async fn trailing_month_counts(
        &self,
        now: DateTime<Utc>,
        n: usize,
    ) -> Result<Vec<((i32, u32), u64)>, ServiceError> {
        let mut counts = Vec::with_capacity(n);
        for (year, month) in buckets::trailing_months(now, n) {
            let Some(bounds) = buckets::month_bounds(year, month) else {
                continue;
            };
            let count = self.count_orders_between(&bounds).await?;
            counts.push(((year, month), count));
        }
        Ok(counts)
    }

    /// Order counts for the trailing `n` quarters, oldest first.
    async fn trailing_quarter_counts(
        &self,
        now: DateTime<Utc>,
        n: usize,
    ) -> Result<Vec<((i32, u32), u64)>, ServiceError> {
        let mut counts = Vec::with_capacity(n);
        for (year, quarter) in buckets::trailing_quarters(now, n) {
            let Some(bounds) = buckets::quarter_bounds(year, quarter) else {
                continue;
            };
            let count = self.count_orders_between(&bounds).await?;
            counts.push(((year, quarter), count));
        }
        Ok(counts)
    }
}
