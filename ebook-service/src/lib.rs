//! ebook-service: emails a download link for a free eBook through Resend.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
