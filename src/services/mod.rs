// Reporting engine
pub mod analytics;

// Thin CRUD collaborators that write the rows the reporting engine reads
pub mod contacts;
pub mod customers;
pub mod messages;
pub mod news;
pub mod orders;

pub use analytics::AnalyticsService;
pub use contacts::ContactService;
pub use customers::CustomerService;
pub use messages::MessageService;
pub use news::NewsService;
pub use orders::OrderService;
