use super::{EmailMessage, EmailProvider, ProviderError, ProviderResponse};
use crate::config::ResendConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::Value;

/// Resend transactional email API.
pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
    endpoint: String,
}

impl ResendProvider {
    pub fn new(config: ResendConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        let endpoint = format!("{}/emails", config.api_url.trim_end_matches('/'));

        Ok(Self {
            config,
            client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport_error(e: reqwest::Error, action: &str) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(format!(
            "Resend did not respond in time while {}: {}",
            action, e
        ))
    } else {
        ProviderError::Connection(format!("Failed to connect to Resend: {}", e))
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(email)
            .send()
            .await
            .map_err(|e| transport_error(e, "sending the message"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, "reading the response"))?;

        // The error payload is passed on byte for byte.
        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse Resend response: {}", e))
        })?;

        let response = ProviderResponse::from_payload(payload);

        tracing::info!(
            to = ?email.to,
            subject = %email.subject,
            provider_id = ?response.provider_id,
            "Email accepted by Resend"
        );

        Ok(response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        // Resend has no health endpoint; a usable key is the best local signal.
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::Configuration(
                "RESEND_API_KEY is not configured".to_string(),
            ));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn config(api_url: &str, api_key: &str) -> ResendConfig {
        ResendConfig {
            api_key: Secret::new(api_key.to_string()),
            api_url: api_url.to_string(),
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let provider = ResendProvider::new(config("https://api.resend.com/", "re_x")).unwrap();
        assert_eq!(provider.endpoint(), "https://api.resend.com/emails");
    }

    #[tokio::test]
    async fn health_check_requires_api_key() {
        let provider = ResendProvider::new(config("https://api.resend.com", "")).unwrap();
        assert!(matches!(
            provider.health_check().await,
            Err(ProviderError::Configuration(_))
        ));

        let provider = ResendProvider::new(config("https://api.resend.com", "re_x")).unwrap();
        assert!(provider.health_check().await.is_ok());
    }
}
