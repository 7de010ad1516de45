use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::SenderType,
    entities::message::{self, ActiveModel as MessageActiveModel, Entity as MessageEntity},
    entities::order::Entity as OrderEntity,
    entities::order_log::{actions, ActiveModel as OrderLogActiveModel},
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMessageRequest {
    pub sender_type: String,
    pub sender_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Message content is required"))]
    pub content: String,
}

/// Service for order-scoped message threads.
#[derive(Clone)]
pub struct MessageService {
    db: Arc<DatabaseConnection>,
}

impl MessageService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Posts a message on an order thread. Admin replies also land on the
    /// order's audit trail so workload reporting can attribute them.
    #[instrument(skip(self, request), fields(order_id = %order_id, sender_type = %request.sender_type))]
    pub async fn post_message(
        &self,
        order_id: Uuid,
        request: CreateMessageRequest,
    ) -> Result<message::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        let sender = SenderType::parse(&request.sender_type).ok_or_else(|| {
            ServiceError::ValidationError(format!("unknown sender type {}", request.sender_type))
        })?;

        let db = &*self.db;
        let now = Utc::now();
        let txn = db.begin().await?;

        if OrderEntity::find_by_id(order_id).one(&txn).await?.is_none() {
            return Err(ServiceError::NotFound(format!("order {order_id} not found")));
        }

        let created = MessageActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            sender_id: Set(request.sender_id),
            sender_type: Set(sender.to_string()),
            content: Set(request.content),
            is_read: Set(false),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if sender == SenderType::Admin {
            OrderLogActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                admin_id: Set(request.sender_id),
                action: Set(actions::RESPONSE.to_string()),
                from_status: Set(None),
                to_status: Set(None),
                note: Set(None),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!(message_id = %created.id, "message posted");
        Ok(created)
    }

    /// The full thread for one order, oldest first.
    #[instrument(skip(self))]
    pub async fn list_messages(&self, order_id: Uuid) -> Result<Vec<message::Model>, ServiceError> {
        let db = &*self.db;
        if OrderEntity::find_by_id(order_id).one(db).await?.is_none() {
            return Err(ServiceError::NotFound(format!("order {order_id} not found")));
        }

        let thread = MessageEntity::find()
            .filter(message::Column::OrderId.eq(order_id))
            .order_by_asc(message::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(thread)
    }
}
