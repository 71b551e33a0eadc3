//! HTTP handlers for ebook-service.

pub mod ebook;
pub mod health;

pub use ebook::{handle_notification_request, send_ebook, SendEbookResponse};
pub use health::{health_check, metrics_endpoint};
