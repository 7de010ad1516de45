use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{NewsCategory, NewsPriority},
    entities::news_item::{
        self, ActiveModel as NewsActiveModel, Column as NewsColumn, Entity as NewsEntity,
    },
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
    pub category: String,
    pub priority: String,
    /// Defaults to public; targeted items are hidden from the open feed.
    pub is_public: Option<bool>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
}

/// Service for the news feed and its engagement counters.
#[derive(Clone)]
pub struct NewsService {
    db: Arc<DatabaseConnection>,
}

impl NewsService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Publishes a news item immediately.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_news(
        &self,
        request: CreateNewsRequest,
    ) -> Result<news_item::Model, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
        let category = request.category.parse::<NewsCategory>().map_err(|_| {
            ServiceError::ValidationError(format!("unknown news category {}", request.category))
        })?;
        let priority = request.priority.parse::<NewsPriority>().map_err(|_| {
            ServiceError::ValidationError(format!("unknown news priority {}", request.priority))
        })?;

        let db = &*self.db;
        let created = NewsActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(request.title),
            body: Set(request.body),
            category: Set(category.to_string()),
            priority: Set(priority.to_string()),
            is_public: Set(request.is_public.unwrap_or(true)),
            is_auto_generated: Set(false),
            read_count: Set(0),
            click_count: Set(0),
            created_by: Set(request.created_by),
            published_at: Set(Utc::now()),
            expires_at: Set(request.expires_at),
        }
        .insert(db)
        .await?;

        info!(news_id = %created.id, "news item published");
        Ok(created)
    }

    /// The open feed: public items already published and not yet expired,
    /// newest first.
    #[instrument(skip(self))]
    pub async fn list_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<news_item::Model>, ServiceError> {
        let db = &*self.db;
        let items = NewsEntity::find()
            .filter(NewsColumn::IsPublic.eq(true))
            .filter(NewsColumn::PublishedAt.lte(now))
            .filter(
                Condition::any()
                    .add(NewsColumn::ExpiresAt.is_null())
                    .add(NewsColumn::ExpiresAt.gte(now)),
            )
            .order_by_desc(NewsColumn::PublishedAt)
            .all(db)
            .await?;
        Ok(items)
    }

    /// Bumps the click counter.
    #[instrument(skip(self))]
    pub async fn record_click(&self, news_id: Uuid) -> Result<news_item::Model, ServiceError> {
        let db = &*self.db;
        let existing = NewsEntity::find_by_id(news_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("news item {news_id} not found")))?;

        let clicks = existing.click_count;
        let mut active: NewsActiveModel = existing.into();
        active.click_count = Set(clicks + 1);
        let updated = active.update(db).await?;
        Ok(updated)
    }

    /// Bumps the read counter.
    #[instrument(skip(self))]
    pub async fn record_read(&self, news_id: Uuid) -> Result<news_item::Model, ServiceError> {
        let db = &*self.db;
        let existing = NewsEntity::find_by_id(news_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("news item {news_id} not found")))?;

        let reads = existing.read_count;
        let mut active: NewsActiveModel = existing.into();
        active.read_count = Set(reads + 1);
        let updated = active.update(db).await?;
        Ok(updated)
    }
}
