use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aurum API",
        version = "0.3.0",
        description = r#"
# Aurum Atelier API

Backend for a made-to-order jewelry atelier: commission orders, customer
records, order messaging, contact tickets, a news feed, and the analytics
reports built on top of all of them.

## Authentication

Public storefront endpoints are open. Administrative endpoints (analytics,
order lifecycle decisions, the ticket inbox, news publishing) require the
static admin bearer token:

```
Authorization: Bearer <admin-token>
```

When no admin token is configured the guard stays open, which is intended
for local development only.

## Time filters

Analytics endpoints accept either `period` (`today`, `week`, `month`,
`quarter`, `year`) or an explicit `start_date`/`end_date` pair in
`YYYY-MM-DD` form. A recognized keyword wins over explicit dates; an
unrecognized keyword falls back to the trailing 30 days. The resolved
window is echoed in each report's `meta` block.

## Error Handling

Errors use a consistent shape with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "Invalid range: start_date 2025-03-10 is after end_date 2025-03-01",
  "timestamp": "2026-01-01T00:00:00Z"
}
```
        "#,
        contact(
            name = "Aurum Engineering",
            email = "engineering@aurum.example"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development"),
        (url = "https://api.aurum.example", description = "Production server")
    ),
    tags(
        (name = "Orders", description = "Commission order management"),
        (name = "Customers", description = "Customer records"),
        (name = "Messages", description = "Per-order message threads"),
        (name = "Contacts", description = "Contact tickets and admin responses"),
        (name = "News", description = "News feed and engagement counters"),
        (name = "Analytics", description = "Time-windowed business reports")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Orders
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::list_order_logs,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::decide_order,

        // Order message threads
        crate::handlers::messages::post_message,
        crate::handlers::messages::list_messages,

        // Customers
        crate::handlers::customers::create_customer,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,

        // Contact tickets
        crate::handlers::contacts::create_contact,
        crate::handlers::contacts::list_contacts,
        crate::handlers::contacts::respond_to_contact,

        // News feed
        crate::handlers::news::create_news,
        crate::handlers::news::list_active_news,
        crate::handlers::news::record_news_click,
        crate::handlers::news::record_news_read,

        // Analytics
        crate::handlers::analytics::get_dashboard,
        crate::handlers::analytics::get_full_analysis,
        crate::handlers::analytics::get_kpi,
        crate::handlers::analytics::get_order_analytics,
        crate::handlers::analytics::get_daily_volume,
        crate::handlers::analytics::get_monthly_volume,
        crate::handlers::analytics::get_customer_analytics,
        crate::handlers::analytics::get_communication_analytics,
        crate::handlers::analytics::get_news_engagement,
        crate::handlers::analytics::get_time_trends,
        crate::handlers::analytics::get_monthly_growth,
        crate::handlers::analytics::get_timeline_alerts,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,

            // Order types
            crate::handlers::orders::OrderResponse,
            crate::handlers::orders::OrderLogResponse,
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::UpdateOrderStatusRequest,
            crate::services::orders::OrderDecisionRequest,

            // Message types
            crate::handlers::messages::MessageResponse,
            crate::services::messages::CreateMessageRequest,

            // Customer types
            crate::handlers::customers::CustomerResponse,
            crate::services::customers::CreateCustomerRequest,

            // Contact ticket types
            crate::handlers::contacts::ContactTicketResponse,
            crate::services::contacts::CreateContactRequest,
            crate::services::contacts::ContactResponseRequest,

            // News types
            crate::handlers::news::NewsItemResponse,
            crate::services::news::CreateNewsRequest,

            // Analytics reports
            crate::services::analytics::reports::ReportMeta,
            crate::services::analytics::reports::FullAnalysisReport,
            crate::services::analytics::reports::dashboard::DashboardReport,
            crate::services::analytics::reports::kpi::KpiReport,
            crate::services::analytics::reports::orders::OrderAnalyticsReport,
            crate::services::analytics::reports::customers::CustomerAnalyticsReport,
            crate::services::analytics::reports::communication::CommunicationReport,
            crate::services::analytics::reports::news::NewsEngagementReport,
            crate::services::analytics::reports::trends::TimeTrendsReport,
            crate::services::analytics::reports::trends::MonthlyGrowthReport,
            crate::services::analytics::reports::trends::DailyVolumeReport,
            crate::services::analytics::reports::trends::MonthlyVolumeReport,
            crate::services::analytics::reports::alerts::TimelineAlertsReport,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Static admin bearer token"))
                        .build(),
                ),
            )
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_includes_core_surfaces() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).expect("doc should serialize");
        assert!(json.contains("Aurum API"));
        assert!(json.contains("/api/v1/orders"));
        assert!(json.contains("/api/v1/analytics/dashboard"));
        assert!(json.contains("Bearer"));
    }
}
