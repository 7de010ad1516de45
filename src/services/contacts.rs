use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{ContactMethod, ContactStatus},
    entities::contact_ticket::{
        self, ActiveModel as TicketActiveModel, Column as TicketColumn, Entity as TicketEntity,
    },
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    /// Preferred way to reach the requester; defaults to email.
    pub contact_method: Option<String>,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
    /// Present when the request concerns a specific order.
    pub order_number: Option<String>,
    /// Present when the requester is a signed-in customer.
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactResponseRequest {
    #[validate(length(min = 1, message = "Response text is required"))]
    pub response: String,
    pub admin_id: Option<Uuid>,
}

/// Service for the public contact form and its admin follow-up.
#[derive(Clone)]
pub struct ContactService {
    db: Arc<DatabaseConnection>,
}

impl ContactService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Accepts a contact form submission, anonymous or signed-in.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_ticket(
        &self,
        request: CreateContactRequest,
    ) -> Result<contact_ticket::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let method = match request.contact_method.as_deref() {
            None => ContactMethod::Email,
            Some(raw) => raw.parse::<ContactMethod>().map_err(|_| {
                ServiceError::ValidationError(format!("unknown contact method {raw}"))
            })?,
        };

        let db = &*self.db;
        let created = TicketActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(request.customer_id),
            name: Set(request.name),
            email: Set(request.email),
            phone: Set(request.phone),
            contact_method: Set(method.to_string()),
            subject: Set(request.subject),
            message: Set(request.message),
            order_number: Set(request.order_number),
            status: Set(ContactStatus::New.to_string()),
            admin_response: Set(None),
            responded_by: Set(None),
            responded_at: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(ticket_id = %created.id, "contact ticket created");
        Ok(created)
    }

    /// Lists tickets newest first, optionally narrowed to one status.
    #[instrument(skip(self))]
    pub async fn list_tickets(
        &self,
        page: u64,
        per_page: u64,
        status: Option<ContactStatus>,
    ) -> Result<(Vec<contact_ticket::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }

        let db = &*self.db;
        let mut finder = TicketEntity::find();
        if let Some(status) = status {
            finder = finder.filter(TicketColumn::Status.eq(status.to_string()));
        }
        let paginator = finder
            .order_by_desc(TicketColumn::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let tickets = paginator.fetch_page(page - 1).await?;
        Ok((tickets, total))
    }

    /// Records the admin response and settles the ticket.
    #[instrument(skip(self, request), fields(ticket_id = %ticket_id))]
    pub async fn respond(
        &self,
        ticket_id: Uuid,
        request: ContactResponseRequest,
    ) -> Result<contact_ticket::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;
        let existing = TicketEntity::find_by_id(ticket_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("ticket {ticket_id} not found")))?;

        let mut active: TicketActiveModel = existing.into();
        active.admin_response = Set(Some(request.response));
        active.responded_by = Set(request.admin_id);
        active.responded_at = Set(Some(Utc::now()));
        active.status = Set(ContactStatus::Resolved.to_string());
        let updated = active.update(db).await?;

        info!(ticket_id = %ticket_id, "contact ticket resolved");
        Ok(updated)
    }
}
