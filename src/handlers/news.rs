use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::news_item, errors::ServiceError, services::news::CreateNewsRequest, ApiResponse,
    AppState,
};

/// Public news feed and engagement tracking, merged under `/api/v1`.
pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_active_news))
        .route("/news/:id/click", post(record_news_click))
        .route("/news/:id/read", post(record_news_read))
}

/// News publishing, gated by the bearer guard.
pub fn news_admin_routes() -> Router<AppState> {
    Router::new().route("/news", post(create_news))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NewsItemResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub category: String,
    pub priority: String,
    pub is_public: bool,
    pub read_count: i64,
    pub click_count: i64,
    pub published_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<news_item::Model> for NewsItemResponse {
    fn from(model: news_item::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            body: model.body,
            category: model.category,
            priority: model.priority,
            is_public: model.is_public,
            read_count: model.read_count,
            click_count: model.click_count,
            published_at: model.published_at,
            expires_at: model.expires_at,
        }
    }
}

/// Publish a news item
#[utoipa::path(
    post,
    path = "/api/v1/news",
    request_body = CreateNewsRequest,
    responses(
        (status = 201, description = "News item published successfully", body = ApiResponse<NewsItemResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "News"
)]
pub async fn create_news(
    State(state): State<AppState>,
    Json(request): Json<CreateNewsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NewsItemResponse>>), ServiceError> {
    let created = state.services.news.create_news(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created.into())),
    ))
}

/// Active feed: public, published, not expired, newest first
#[utoipa::path(
    get,
    path = "/api/v1/news",
    responses(
        (status = 200, description = "News retrieved successfully", body = ApiResponse<Vec<NewsItemResponse>>)
    ),
    tag = "News"
)]
pub async fn list_active_news(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<NewsItemResponse>>>, ServiceError> {
    let items = state.services.news.list_active(Utc::now()).await?;
    Ok(Json(ApiResponse::success(
        items.into_iter().map(NewsItemResponse::from).collect(),
    )))
}

/// Count a click-through on a news item
#[utoipa::path(
    post,
    path = "/api/v1/news/{id}/click",
    params(("id" = Uuid, Path, description = "News item id")),
    responses(
        (status = 200, description = "Click recorded successfully", body = ApiResponse<NewsItemResponse>),
        (status = 404, description = "News item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "News"
)]
pub async fn record_news_click(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NewsItemResponse>>, ServiceError> {
    let updated = state.services.news.record_click(id).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}

/// Count a read of a news item
#[utoipa::path(
    post,
    path = "/api/v1/news/{id}/read",
    params(("id" = Uuid, Path, description = "News item id")),
    responses(
        (status = 200, description = "Read recorded successfully", body = ApiResponse<NewsItemResponse>),
        (status = 404, description = "News item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "News"
)]
pub async fn record_news_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NewsItemResponse>>, ServiceError> {
    let updated = state.services.news.record_read(id).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}
