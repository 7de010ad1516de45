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
    entities::customer::{
        self, ActiveModel as CustomerActiveModel, Column as CustomerColumn,
        Entity as CustomerEntity,
    },
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Service for managing customer accounts
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
}

impl CustomerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a new customer account. Emails are unique.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<customer::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;
        let existing = CustomerEntity::find()
            .filter(CustomerColumn::Email.eq(request.email.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "email {} is already registered",
                request.email
            )));
        }

        let created = CustomerActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            email: Set(request.email),
            phone: Set(request.phone),
            is_admin: Set(request.is_admin),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(customer_id = %created.id, "customer created");
        Ok(created)
    }

    /// Gets a customer by ID.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, customer_id: Uuid) -> Result<customer::Model, ServiceError> {
        let db = &*self.db;
        CustomerEntity::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("customer {customer_id} not found")))
    }

    /// Lists customers, newest first.
    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<customer::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }

        let db = &*self.db;
        let paginator = CustomerEntity::find()
            .order_by_desc(CustomerColumn::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let customers = paginator.fetch_page(page - 1).await?;
        Ok((customers, total))
    }
}
