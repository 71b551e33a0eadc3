//! Application startup and lifecycle management.

use crate::config::{EbookConfig, SenderConfig};
use crate::handlers::{health_check, metrics_endpoint, send_ebook};
use crate::models::EbookCatalog;
use crate::services::{EmailProvider, ResendProvider};
use axum::{
    http::{Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub sender: SenderConfig,
    pub catalog: Arc<EbookCatalog>,
    pub email_provider: Arc<dyn EmailProvider>,
}

/// Build the HTTP router for `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/send-ebook", post(send_ebook))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        // Public endpoint: any origin, on success and failure alike.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the Resend provider from `config`.
    pub async fn build(config: EbookConfig) -> Result<Self, AppError> {
        let provider = ResendProvider::new(config.resend.clone()).map_err(|e| {
            tracing::error!("Failed to initialize Resend provider: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;
        tracing::info!(endpoint = provider.endpoint(), "Resend email provider initialized");

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: EbookConfig,
        email_provider: Arc<dyn EmailProvider>,
    ) -> Result<Self, AppError> {
        let catalog = EbookCatalog::builtin();
        tracing::info!(ebooks = ?catalog.keys().collect::<Vec<_>>(), "eBook catalog loaded");

        let state = AppState {
            sender: config.sender.clone(),
            catalog: Arc::new(catalog),
            email_provider,
        };

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("eBook service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = router(self.state);

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{EmailMessage, ProviderError, ProviderResponse};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StaticProvider;

    #[async_trait]
    impl EmailProvider for StaticProvider {
        async fn send(&self, _email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse::from_payload(json!({ "id": "msg_1" })))
        }

        async fn health_check(&self) -> Result<(), ProviderError> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    fn app() -> Router {
        router(AppState {
            sender: SenderConfig {
                from_email: "support@stemsphere.academy".to_string(),
                from_name: "STEMSphere Academy".to_string(),
            },
            catalog: Arc::new(EbookCatalog::builtin()),
            email_provider: Arc::new(StaticProvider),
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_response_has_cors_header() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/send-ebook")
                    .header(header::ORIGIN, "https://stemsphere.academy")
                    .body(Body::from(
                        r#"{"email":"a@b.com","name":"Ana","ebookType":"free_stem_study_system"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "data": { "id": "msg_1" } })
        );
    }

    #[tokio::test]
    async fn failure_response_has_cors_header() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/send-ebook")
                    .header(header::ORIGIN, "https://stemsphere.academy")
                    .body(Body::from(
                        r#"{"email":"a@b.com","name":"Ana","ebookType":"unknown_key"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "error": "Invalid eBook type" })
        );
    }

    #[tokio::test]
    async fn preflight_is_answered() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/send-ebook")
                    .header(header::ORIGIN, "https://stemsphere.academy")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn health_reports_catalog_size() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "ebook-service");
        assert_eq!(body["catalog_size"], 2);
    }
}
