use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::OrderStatus,
    entities::customer::Entity as CustomerEntity,
    entities::order::{
        self, ActiveModel as OrderActiveModel, Column as OrderColumn, Entity as OrderEntity,
    },
    entities::order_log::{self, actions, ActiveModel as OrderLogActiveModel},
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub gold_color: Option<String>,
    pub gold_weight: Option<Decimal>,
    pub diamond_size: Option<Decimal>,
    pub special_requirements: Option<String>,
    pub estimated_value: Option<Decimal>,
    pub delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    pub declined_reason: Option<String>,
    /// Acting admin account, recorded on the audit row.
    pub admin_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Accept,
    Decline,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderDecisionRequest {
    pub action: DecisionAction,
    pub declined_reason: Option<String>,
    pub admin_id: Option<Uuid>,
}

/// Server-generated human order number, `ORD` + date + short random suffix.
fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("ORD{}{}", now.format("%Y%m%d"), suffix)
}

async fn append_log(
    txn: &DatabaseTransaction,
    order_id: Uuid,
    admin_id: Option<Uuid>,
    action: &str,
    from_status: Option<&str>,
    to_status: Option<&str>,
    note: Option<String>,
    at: DateTime<Utc>,
) -> Result<(), ServiceError> {
    OrderLogActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        admin_id: Set(admin_id),
        action: Set(action.to_string()),
        from_status: Set(from_status.map(str::to_string)),
        to_status: Set(to_status.map(str::to_string)),
        note: Set(note),
        created_at: Set(at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

/// Service for managing commission orders and their audit trail.
///
/// Every status mutation appends an audit row in the same transaction as the
/// order update; stage-duration reporting is reconstructed from that trail.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates an order in the `new` status with a generated order number.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<order::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;
        let now = Utc::now();

        let txn = db.begin().await?;

        if CustomerEntity::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(ServiceError::ValidationError(format!(
                "customer {} does not exist",
                request.customer_id
            )));
        }

        let order_id = Uuid::new_v4();
        let created = OrderActiveModel {
            id: Set(order_id),
            order_number: Set(generate_order_number(now)),
            customer_id: Set(request.customer_id),
            status: Set(OrderStatus::New.to_string()),
            description: Set(Some(request.description)),
            gold_color: Set(request.gold_color),
            gold_weight: Set(request.gold_weight),
            diamond_size: Set(request.diamond_size),
            special_requirements: Set(request.special_requirements),
            estimated_value: Set(request.estimated_value),
            delivery_date: Set(request.delivery_date),
            declined_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        append_log(
            &txn,
            order_id,
            None,
            actions::ORDER_CREATED,
            None,
            Some(&created.status),
            None,
            now,
        )
        .await?;

        txn.commit().await?;

        info!(order_id = %order_id, order_number = %created.order_number, "order created");
        Ok(created)
    }

    /// Gets an order by ID.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        let db = &*self.db;
        OrderEntity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id} not found")))
    }

    /// Lists orders newest first, optionally narrowed to one status.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        page: u64,
        per_page: u64,
        status: Option<OrderStatus>,
    ) -> Result<(Vec<order::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }

        let db = &*self.db;
        let mut finder = OrderEntity::find();
        if let Some(status) = status {
            finder = finder.filter(OrderColumn::Status.eq(status.to_string()));
        }
        let paginator = finder
            .order_by_desc(OrderColumn::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page - 1).await?;
        Ok((orders, total))
    }

    /// Audit rows for one order, newest first.
    #[instrument(skip(self))]
    pub async fn order_logs(&self, order_id: Uuid) -> Result<Vec<order_log::Model>, ServiceError> {
        let db = &*self.db;
        self.get_order(order_id).await?;
        let logs = order_log::Entity::find()
            .filter(order_log::Column::OrderId.eq(order_id))
            .order_by_desc(order_log::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(logs)
    }

    /// Moves an order one step along the pipeline, or to `declined` from any
    /// non-terminal status. The audit row lands in the same transaction.
    #[instrument(skip(self, request), fields(order_id = %order_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<order::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        let target = OrderStatus::parse(&request.status).ok_or_else(|| {
            ServiceError::InvalidStatus(format!("unknown status {}", request.status))
        })?;

        let db = &*self.db;
        let txn = db.begin().await?;

        let existing = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id} not found")))?;

        let current = OrderStatus::parse(&existing.status).ok_or_else(|| {
            ServiceError::InvalidStatus(format!(
                "order {order_id} carries unknown status {}",
                existing.status
            ))
        })?;

        if !current.can_transition_to(target) {
            warn!(order_id = %order_id, from = %current, to = %target, "rejected status transition");
            return Err(ServiceError::InvalidStatus(format!(
                "cannot move from {current} to {target}"
            )));
        }

        let now = Utc::now();
        let old_status = existing.status.clone();
        let mut active: OrderActiveModel = existing.into();
        active.status = Set(target.to_string());
        active.updated_at = Set(now);
        if target == OrderStatus::Declined {
            active.declined_reason = Set(request.declined_reason.clone());
        }
        let updated = active.update(&txn).await?;

        append_log(
            &txn,
            order_id,
            request.admin_id,
            actions::STATUS_CHANGE,
            Some(&old_status),
            Some(&updated.status),
            None,
            now,
        )
        .await?;
        if target == OrderStatus::Declined {
            append_log(
                &txn,
                order_id,
                request.admin_id,
                actions::DECLINATION,
                Some(&old_status),
                Some(&updated.status),
                request.declined_reason,
                now,
            )
            .await?;
        }

        txn.commit().await?;

        info!(order_id = %order_id, from = %old_status, to = %target, "order status updated");
        Ok(updated)
    }

    /// Admin intake decision: accept jumps the order to the CAD stage,
    /// decline closes it with a reason.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn decide(
        &self,
        order_id: Uuid,
        request: OrderDecisionRequest,
    ) -> Result<order::Model, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await?;

        let existing = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {order_id} not found")))?;

        let current = OrderStatus::parse(&existing.status).ok_or_else(|| {
            ServiceError::InvalidStatus(format!(
                "order {order_id} carries unknown status {}",
                existing.status
            ))
        })?;

        let target = match request.action {
            DecisionAction::Accept => {
                if !matches!(current, OrderStatus::New | OrderStatus::Confirmed) {
                    return Err(ServiceError::InvalidStatus(format!(
                        "cannot accept an order in status {current}"
                    )));
                }
                OrderStatus::CadDone
            }
            DecisionAction::Decline => {
                if current.is_terminal() {
                    return Err(ServiceError::InvalidStatus(format!(
                        "cannot decline an order in status {current}"
                    )));
                }
                OrderStatus::Declined
            }
        };

        let now = Utc::now();
        let old_status = existing.status.clone();
        let mut active: OrderActiveModel = existing.into();
        active.status = Set(target.to_string());
        active.updated_at = Set(now);
        if target == OrderStatus::Declined {
            active.declined_reason = Set(request.declined_reason.clone());
        }
        let updated = active.update(&txn).await?;

        append_log(
            &txn,
            order_id,
            request.admin_id,
            actions::STATUS_CHANGE,
            Some(&old_status),
            Some(&updated.status),
            None,
            now,
        )
        .await?;
        if target == OrderStatus::Declined {
            append_log(
                &txn,
                order_id,
                request.admin_id,
                actions::DECLINATION,
                Some(&old_status),
                Some(&updated.status),
                request.declined_reason,
                now,
            )
            .await?;
        }

        txn.commit().await?;

        info!(order_id = %order_id, from = %old_status, to = %target, "order decision applied");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn order_number_carries_date_and_suffix() {
        let now = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap();
        let number = generate_order_number(now);
        assert!(number.starts_with("ORD20250715"));
        assert_eq!(number.len(), "ORD20250715".len() + 6);
        assert!(number["ORD20250715".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }
}
