#![allow(dead_code)]

use ebook_service::config::{EbookConfig, ResendConfig, SenderConfig};
use ebook_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "re_test_key";

pub struct TestApp {
    pub address: String,
    /// Stand-in for the Resend API. Mount expectations on it per test.
    pub resend: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_api_url(None).await
    }

    /// Spawn against `api_url` instead of the mock server, e.g. an address
    /// nothing listens on.
    pub async fn spawn_with_api_url(api_url: Option<String>) -> Self {
        Self::spawn_with(api_url, Some(5)).await
    }

    /// Spawn with a provider timeout of `timeout_secs` seconds.
    pub async fn spawn_with_timeout(timeout_secs: u64) -> Self {
        Self::spawn_with(None, Some(timeout_secs)).await
    }

    async fn spawn_with(api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        let resend = MockServer::start().await;

        // Use random port for testing (port 0)
        let config = EbookConfig {
            common: CoreConfig {
                port: 0,
                log_level: "info".to_string(),
            },
            resend: ResendConfig {
                api_key: Secret::new(TEST_API_KEY.to_string()),
                api_url: api_url.unwrap_or_else(|| resend.uri()),
                timeout_secs,
            },
            sender: SenderConfig {
                from_email: "support@stemsphere.academy".to_string(),
                from_name: "STEMSphere Academy".to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            resend,
        }
    }

    pub async fn post_send_ebook(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/send-ebook", self.address))
            .header("Origin", "https://stemsphere.academy")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
