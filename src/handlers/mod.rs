pub mod analytics;
pub mod contacts;
pub mod customers;
pub mod messages;
pub mod news;
pub mod orders;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::services::{
    AnalyticsService, ContactService, CustomerService, MessageService, NewsService, OrderService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub analytics: Arc<AnalyticsService>,
    pub contacts: Arc<ContactService>,
    pub customers: Arc<CustomerService>,
    pub messages: Arc<MessageService>,
    pub news: Arc<NewsService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        Self {
            analytics: Arc::new(AnalyticsService::new(
                db.clone(),
                config.revenue_target_monthly,
            )),
            contacts: Arc::new(ContactService::new(db.clone())),
            customers: Arc::new(CustomerService::new(db.clone())),
            messages: Arc::new(MessageService::new(db.clone())),
            news: Arc::new(NewsService::new(db.clone())),
            orders: Arc::new(OrderService::new(db)),
        }
    }
}
