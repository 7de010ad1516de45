use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    domain::ContactStatus,
    entities::contact_ticket,
    errors::ServiceError,
    services::contacts::{ContactResponseRequest, CreateContactRequest},
    ApiResponse, AppState, PaginatedResponse,
};

/// Public contact-form intake, merged under `/api/v1`.
pub fn contacts_routes() -> Router<AppState> {
    Router::new().route("/contacts", post(create_contact))
}

/// Admin inbox routes, gated by the bearer guard.
pub fn contact_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts))
        .route("/contacts/:id/response", post(respond_to_contact))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ContactListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Filter by ticket status (e.g. `new`, `resolved`)
    pub status: Option<String>,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactTicketResponse {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub contact_method: String,
    pub subject: String,
    pub message: String,
    pub order_number: Option<String>,
    pub status: String,
    pub admin_response: Option<String>,
    pub responded_by: Option<Uuid>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<contact_ticket::Model> for ContactTicketResponse {
    fn from(model: contact_ticket::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            contact_method: model.contact_method,
            subject: model.subject,
            message: model.message,
            order_number: model.order_number,
            status: model.status,
            admin_response: model.admin_response,
            responded_by: model.responded_by,
            responded_at: model.responded_at,
            created_at: model.created_at,
        }
    }
}

/// Submit a contact form
#[utoipa::path(
    post,
    path = "/api/v1/contacts",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Ticket created successfully", body = ApiResponse<ContactTicketResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse)
    ),
    tag = "Contacts"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactTicketResponse>>), ServiceError> {
    let created = state.services.contacts.create_ticket(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created.into())),
    ))
}

/// Admin inbox of contact tickets, newest first
#[utoipa::path(
    get,
    path = "/api/v1/contacts",
    params(ContactListQuery),
    responses(
        (status = 200, description = "Tickets retrieved successfully", body = ApiResponse<PaginatedResponse<ContactTicketResponse>>),
        (status = 400, description = "Invalid request parameters", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Contacts"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<ContactTicketResponse>>>, ServiceError> {
    let status = query
        .status
        .as_deref()
        .map(|raw| {
            ContactStatus::parse(raw).ok_or_else(|| {
                ServiceError::InvalidStatus(format!("Unknown ticket status: {raw}"))
            })
        })
        .transpose()?;

    let limit = query.limit.clamp(1, 100);
    let (tickets, total) = state
        .services
        .contacts
        .list_tickets(query.page, limit, status)
        .await?;
    let total_pages = total.div_ceil(limit);

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items: tickets
            .into_iter()
            .map(ContactTicketResponse::from)
            .collect(),
        total,
        page: query.page,
        limit,
        total_pages,
    })))
}

/// Record an admin response, resolving the ticket
#[utoipa::path(
    post,
    path = "/api/v1/contacts/{id}/response",
    params(("id" = Uuid, Path, description = "Ticket id")),
    request_body = ContactResponseRequest,
    responses(
        (status = 200, description = "Response recorded successfully", body = ApiResponse<ContactTicketResponse>),
        (status = 400, description = "Invalid request data", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Ticket not found", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Contacts"
)]
pub async fn respond_to_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ContactResponseRequest>,
) -> Result<Json<ApiResponse<ContactTicketResponse>>, ServiceError> {
    let updated = state.services.contacts.respond(id, request).await?;
    Ok(Json(ApiResponse::success(updated.into())))
}
