use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only audit trail of order activity.
///
/// Rows with `action = "status_change"` carry the `from_status`/`to_status`
/// pair the transition reconstructor walks; other actions (`file_upload`,
/// `response`, `declination`, ...) feed the operational report.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub admin_id: Option<Uuid>,
    pub action: String,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::AdminId",
        to = "super::customer::Column::Id"
    )]
    Admin,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Audit actions written by the order services.
pub mod actions {
    pub const STATUS_CHANGE: &str = "status_change";
    pub const FILE_UPLOAD: &str = "file_upload";
    pub const RESPONSE: &str = "response";
    pub const DECLINATION: &str = "declination";
    pub const ORDER_CREATED: &str = "order_created";
}
