use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;

use crate::{
    errors::ServiceError,
    services::analytics::{
        reports::{
            alerts::TimelineAlertsReport, communication::CommunicationReport,
            customers::CustomerAnalyticsReport, dashboard::DashboardReport, kpi::KpiReport,
            news::NewsEngagementReport, orders::OrderAnalyticsReport,
            trends::{DailyVolumeReport, MonthlyGrowthReport, MonthlyVolumeReport, TimeTrendsReport},
            FullAnalysisReport,
        },
        PeriodQuery,
    },
    ApiResponse, AppState,
};

/// Build the analytics Router scoped under `/api/v1/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/full", get(get_full_analysis))
        .route("/kpi", get(get_kpi))
        .route("/orders", get(get_order_analytics))
        .route("/orders/daily-volume", get(get_daily_volume))
        .route("/orders/monthly-volume", get(get_monthly_volume))
        .route("/customers", get(get_customer_analytics))
        .route("/communication", get(get_communication_analytics))
        .route("/news", get(get_news_engagement))
        .route("/trends", get(get_time_trends))
        .route("/trends/monthly-growth", get(get_monthly_growth))
        .route("/alerts/timeline", get(get_timeline_alerts))
}

/// Admin dashboard summary
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Dashboard retrieved successfully", body = ApiResponse<DashboardReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<DashboardReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_dashboard(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Every report section in one response
#[utoipa::path(
    get,
    path = "/api/v1/analytics/full",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Full analysis retrieved successfully", body = ApiResponse<FullAnalysisReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_full_analysis(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<FullAnalysisReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_full_analysis(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// KPI cards with change against the previous window
#[utoipa::path(
    get,
    path = "/api/v1/analytics/kpi",
    params(PeriodQuery),
    responses(
        (status = 200, description = "KPI metrics retrieved successfully", body = ApiResponse<KpiReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_kpi(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<KpiReport>>, ServiceError> {
    let report = state.services.analytics.get_kpi(&query, Utc::now()).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Order analytics: status groups, stage durations, deadline alerts
#[utoipa::path(
    get,
    path = "/api/v1/analytics/orders",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Order analytics retrieved successfully", body = ApiResponse<OrderAnalyticsReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_order_analytics(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<OrderAnalyticsReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_order_analytics(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Dense per-day order counts for the window
#[utoipa::path(
    get,
    path = "/api/v1/analytics/orders/daily-volume",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Daily volume retrieved successfully", body = ApiResponse<DailyVolumeReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_daily_volume(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<DailyVolumeReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_daily_volume(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Order counts for the trailing twelve calendar months
#[utoipa::path(
    get,
    path = "/api/v1/analytics/orders/monthly-volume",
    responses(
        (status = 200, description = "Monthly volume retrieved successfully", body = ApiResponse<MonthlyVolumeReport>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_monthly_volume(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MonthlyVolumeReport>>, ServiceError> {
    let report = state.services.analytics.get_monthly_volume(Utc::now()).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Customer base and repeat-business analytics
#[utoipa::path(
    get,
    path = "/api/v1/analytics/customers",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Customer analytics retrieved successfully", body = ApiResponse<CustomerAnalyticsReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_customer_analytics(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<CustomerAnalyticsReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_customer_analytics(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Message and support-ticket analytics
#[utoipa::path(
    get,
    path = "/api/v1/analytics/communication",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Communication analytics retrieved successfully", body = ApiResponse<CommunicationReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_communication_analytics(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<CommunicationReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_communication_analytics(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// News reach and engagement
#[utoipa::path(
    get,
    path = "/api/v1/analytics/news",
    params(PeriodQuery),
    responses(
        (status = 200, description = "News engagement retrieved successfully", body = ApiResponse<NewsEngagementReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_news_engagement(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<NewsEngagementReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_news_engagement(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Daily, weekly and monthly order trends
#[utoipa::path(
    get,
    path = "/api/v1/analytics/trends",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Time trends retrieved successfully", body = ApiResponse<TimeTrendsReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_time_trends(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<TimeTrendsReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_time_trends(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Month-over-month and quarter-over-quarter growth
#[utoipa::path(
    get,
    path = "/api/v1/analytics/trends/monthly-growth",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Growth trends retrieved successfully", body = ApiResponse<MonthlyGrowthReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_monthly_growth(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<MonthlyGrowthReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_monthly_growth(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Delivery deadline alerts with per-order detail rows
#[utoipa::path(
    get,
    path = "/api/v1/analytics/alerts/timeline",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Timeline alerts retrieved successfully", body = ApiResponse<TimelineAlertsReport>),
        (status = 400, description = "Invalid date range", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Analytics"
)]
pub async fn get_timeline_alerts(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<TimelineAlertsReport>>, ServiceError> {
    let report = state
        .services
        .analytics
        .get_timeline_alerts(&query, Utc::now())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}
