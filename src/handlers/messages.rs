use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::message, errors::ServiceError, services::messages::CreateMessageRequest,
    ApiResponse, AppState,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub sender_type: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<message::Model> for MessageResponse {
    fn from(model: message::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            sender_id: model.sender_id,
            sender_type: model.sender_type,
            content: model.content,
            is_read: model.is_read,
            created_at: model.created_at,
        }
    }
}

/// Post a message to an order's thread
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/messages",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message posted successfully", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Messages"
)]
pub async fn post_message(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ServiceError> {
    let message = state
        .services
        .messages
        .post_message(order_id, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(message.into())),
    ))
}

/// Conversation thread of an order, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/messages",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Messages retrieved successfully", body = ApiResponse<Vec<MessageResponse>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Messages"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, ServiceError> {
    let messages = state.services.messages.list_messages(order_id).await?;
    Ok(Json(ApiResponse::success(
        messages.into_iter().map(MessageResponse::from).collect(),
    )))
}
