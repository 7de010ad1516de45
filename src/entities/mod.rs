pub mod contact_ticket;
pub mod customer;
pub mod message;
pub mod news_item;
pub mod order;
pub mod order_file;
pub mod order_log;
