use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    domain::OrderStatus,
    entities::{order, order_log},
    errors::ServiceError,
    services::orders::{CreateOrderRequest, OrderDecisionRequest, UpdateOrderStatusRequest},
    ApiResponse, AppState, PaginatedResponse,
};

/// Order routes, merged under `/api/v1`.
///
/// Status and decision mutations are admin-gated at assembly time, so they
/// live in [`order_admin_routes`] instead.
pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/logs", get(list_order_logs))
        .route(
            "/orders/:id/messages",
            post(super::messages::post_message).get(super::messages::list_messages),
        )
}

/// Admin-side order mutations, gated by the bearer guard.
pub fn order_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/:id/status", put(update_order_status))
        .route("/orders/:id/decision", post(decide_order))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Filter by pipeline status (e.g. `new`, `casting`)
    pub status: Option<String>,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub status: String,
    pub description: Option<String>,
    pub gold_color: Option<String>,
    pub gold_weight: Option<Decimal>,
    pub diamond_size: Option<Decimal>,
    pub special_requirements: Option<String>,
    pub estimated_value: Option<Decimal>,
    pub delivery_date: Option<NaiveDate>,
    pub declined_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            customer_id: model.customer_id,
            status: model.status,
            description: model.description,
            gold_color: model.gold_color,
            gold_weight: model.gold_weight,
            diamond_size: model.diamond_size,
            special_requirements: model.special_requirements,
            estimated_value: model.estimated_value,
            delivery_date: model.delivery_date,
            declined_reason: model.declined_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderLogResponse {
    pub id: Uuid,
    pub action: String,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub note: Option<String>,
    pub admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<order_log::Model> for OrderLogResponse {
    fn from(model: order_log::Model) -> Self {
        Self {
            id: model.id,
            action: model.action,
            from_status: model.from_status,
            to_status: model.to_status,
            note: model.note,
            admin_id: model.admin_id,
            created_at: model.created_at,
        }
    }
}

/// Create a new commission order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ServiceError> {
    let created = state.services.orders.create_order(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created.into())),
    ))
}

/// List orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders retrieved successfully", body = ApiResponse<PaginatedResponse<OrderResponse>>),
        (status = 400, description = "Invalid request parameters", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<OrderResponse>>>, ServiceError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            OrderStatus::parse(raw).ok_or_else(|| {
                ServiceError::InvalidStatus(format!("Unknown order status: {raw}"))
            })
        })
        .transpose()?;

    let limit = query.limit.clamp(1, 100);
    let (orders, total) = state
        .services
        .orders
        .list_orders(query.page, limit, status)
        .await?;
    let total_pages = total.div_ceil(limit);

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items: orders.into_iter().map(OrderResponse::from).collect(),
        total,
        page: query.page,
        limit,
        total_pages,
    })))
}

/// Get an order by id
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let order = state.services.orders.get_order(id).await?;
    Ok(Json(ApiResponse::success(order.into())))
}

/// Audit trail of an order, newest entry first
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/logs",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Logs retrieved successfully", body = ApiResponse<Vec<OrderLogResponse>>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn list_order_logs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<OrderLogResponse>>>, ServiceError> {
    let logs = state.services.orders.order_logs(id).await?;
    Ok(Json(ApiResponse::success(
        logs.into_iter().map(OrderLogResponse::from).collect(),
    )))
}

/// Move an order along the pipeline
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Transition not allowed", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let updated = state.services.orders.update_status(id, request).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

/// Accept or decline a commission
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/decision",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = OrderDecisionRequest,
    responses(
        (status = 200, description = "Decision recorded successfully", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Decision not allowed in current status", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Orders"
)]
pub async fn decide_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<OrderDecisionRequest>,
) -> Result<Json<ApiResponse<OrderResponse>>, ServiceError> {
    let updated = state.services.orders.decide(id, request).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}
