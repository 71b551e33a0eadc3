use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

use crate::services::get_metrics;
use crate::startup::AppState;

/// Liveness plus a local check of the provider configuration.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    if state.catalog.is_empty() {
        tracing::error!("eBook catalog is empty");
        return Err(AppError::ServiceUnavailable);
    }

    state.email_provider.health_check().await.map_err(|e| {
        tracing::error!(
            provider = state.email_provider.name(),
            error = %e,
            "Email provider health check failed"
        );
        AppError::ServiceUnavailable
    })?;

    Ok(Json(json!({
        "status": "ok",
        "service": "ebook-service",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_size": state.catalog.len(),
    })))
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
