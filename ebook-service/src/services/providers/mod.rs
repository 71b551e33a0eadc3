pub mod resend;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use resend::ResendProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// The configured request timeout elapsed before Resend answered.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The provider answered with a non-success status. `body` is its error
    /// payload, kept verbatim for diagnostics.
    #[error("Resend API error: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Acknowledgement returned by the provider for an accepted message.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
    pub payload: Value,
}

impl ProviderResponse {
    pub fn from_payload(payload: Value) -> Self {
        let provider_id = payload
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            provider_id,
            payload,
        }
    }
}

/// A single rendered notification, addressed to one recipient.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError>;
    async fn health_check(&self) -> Result<(), ProviderError>;
    fn name(&self) -> &'static str;
}
