//! Shared harness for integration tests: the full application router
//! backed by a throwaway SQLite database, plus row-level seed helpers
//! for building report scenarios at fixed timestamps.
//
// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, IntoActiveModel};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use aurum_api::{
    config::AppConfig,
    db,
    domain::{ContactStatus, NewsCategory, NewsPriority, OrderStatus, SenderType},
    entities::{
        contact_ticket, customer, message, news_item, order, order_file,
        order_log::{self, actions},
    },
    AppState,
};

/// Bearer token the harness configures for the admin guard.
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Helper harness for spinning up the application against a fresh
/// file-backed SQLite database. The temp directory lives as long as the
/// harness so the database survives the whole test.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: tempfile::TempDir,
}

impl TestApp {
    /// Construct a test application with the default test configuration:
    /// admin guard armed with [`ADMIN_TOKEN`], migrations applied.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Construct a test application, letting the caller adjust the
    /// configuration before the router is built.
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("aurum_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.admin_token = Some(ADMIN_TOKEN.to_string());
        customize(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = aurum_api::app(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for admin-authenticated requests.
    pub async fn request_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(ADMIN_TOKEN)).await
    }

    /// Inserts a customer row directly, bypassing the API.
    pub async fn seed_customer(&self, name: &str, created_at: DateTime<Utc>) -> customer::Model {
        customer::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!(
                "{}-{}@example.com",
                name.to_lowercase().replace(' ', "."),
                Uuid::new_v4().simple()
            ),
            phone: None,
            is_admin: false,
            is_active: true,
            created_at,
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed customer")
    }

    /// Inserts an order row directly with a fixed status and timestamp.
    pub async fn seed_order(
        &self,
        customer_id: Uuid,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        estimated_value: Option<Decimal>,
    ) -> order::Model {
        order::Model {
            estimated_value,
            ..self.order_template(customer_id, status, created_at)
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed order")
    }

    /// Like [`TestApp::seed_order`], with the design fields filled in for
    /// the product-preference reports.
    #[allow(clippy::too_many_arguments)]
    pub async fn seed_design_order(
        &self,
        customer_id: Uuid,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        gold_color: &str,
        gold_weight: Decimal,
        diamond_size: Decimal,
        estimated_value: Option<Decimal>,
    ) -> order::Model {
        order::Model {
            gold_color: Some(gold_color.to_string()),
            gold_weight: Some(gold_weight),
            diamond_size: Some(diamond_size),
            estimated_value,
            ..self.order_template(customer_id, status, created_at)
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed design order")
    }

    /// Like [`TestApp::seed_order`], with a delivery deadline for the
    /// timeline-alert reports.
    pub async fn seed_order_due(
        &self,
        customer_id: Uuid,
        status: OrderStatus,
        created_at: DateTime<Utc>,
        delivery_date: chrono::NaiveDate,
    ) -> order::Model {
        order::Model {
            delivery_date: Some(delivery_date),
            ..self.order_template(customer_id, status, created_at)
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed order with deadline")
    }

    fn order_template(
        &self,
        customer_id: Uuid,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> order::Model {
        order::Model {
            id: Uuid::new_v4(),
            order_number: format!("ORD-T{}", &Uuid::new_v4().simple().to_string()[..10]),
            customer_id,
            status: status.to_string(),
            description: Some("seeded commission".to_string()),
            gold_color: None,
            gold_weight: None,
            diamond_size: None,
            special_requirements: None,
            estimated_value: None,
            delivery_date: None,
            declined_reason: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Inserts an audit row directly, for reconstructing stage timings.
    pub async fn seed_status_log(
        &self,
        order_id: Uuid,
        from_status: Option<OrderStatus>,
        to_status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> order_log::Model {
        order_log::Model {
            id: Uuid::new_v4(),
            order_id,
            admin_id: None,
            action: actions::STATUS_CHANGE.to_string(),
            from_status: from_status.map(|s| s.to_string()),
            to_status: Some(to_status.to_string()),
            note: None,
            created_at,
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed status log")
    }

    /// Inserts an order message row directly.
    pub async fn seed_message(
        &self,
        order_id: Uuid,
        sender_type: SenderType,
        created_at: DateTime<Utc>,
    ) -> message::Model {
        message::Model {
            id: Uuid::new_v4(),
            order_id,
            sender_id: Some(Uuid::new_v4()),
            sender_type: sender_type.to_string(),
            content: "seeded message".to_string(),
            is_read: true,
            created_at,
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed message")
    }

    /// Inserts a contact ticket row directly.
    pub async fn seed_ticket(
        &self,
        status: ContactStatus,
        created_at: DateTime<Utc>,
    ) -> contact_ticket::Model {
        contact_ticket::Model {
            id: Uuid::new_v4(),
            customer_id: None,
            name: "Guest".to_string(),
            email: "guest@example.com".to_string(),
            phone: None,
            contact_method: "email".to_string(),
            subject: "question".to_string(),
            message: "seeded ticket".to_string(),
            order_number: None,
            status: status.to_string(),
            admin_response: None,
            responded_by: None,
            responded_at: None,
            created_at,
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed ticket")
    }

    /// Inserts a news item row directly.
    pub async fn seed_news(
        &self,
        category: NewsCategory,
        priority: NewsPriority,
        published_at: DateTime<Utc>,
    ) -> news_item::Model {
        news_item::Model {
            id: Uuid::new_v4(),
            title: "Seeded news".to_string(),
            body: "...".to_string(),
            category: category.to_string(),
            priority: priority.to_string(),
            is_public: true,
            is_auto_generated: false,
            read_count: 0,
            click_count: 0,
            created_by: None,
            published_at,
            expires_at: None,
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed news item")
    }

    /// Inserts an order file row directly.
    pub async fn seed_order_file(
        &self,
        order_id: Uuid,
        stage: &str,
        uploaded_at: DateTime<Utc>,
    ) -> order_file::Model {
        order_file::Model {
            id: Uuid::new_v4(),
            order_id,
            stage: stage.to_string(),
            file_name: "design.stl".to_string(),
            uploaded_by: None,
            uploaded_at,
        }
        .into_active_model()
        .insert(&*self.state.db)
        .await
        .expect("seed order file")
    }
}

/// Reads a response body as JSON.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}

/// Fixed UTC timestamp helper for readable seed data.
pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}
