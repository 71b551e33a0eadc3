//! Request-level errors of the eBook endpoint.
//!
//! Every variant is rendered as HTTP 500 with `{"success": false, "error":
//! "<message>"}` so that callers see one failure shape.

use crate::services::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Client-attributable input problems. Never retried, never sent upstream.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Invalid eBook type")]
    UnknownEbookType(String),
}

#[derive(Debug, Error)]
pub enum EbookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Provider unreachable or provider rejected the message.
    #[error(transparent)]
    Delivery(#[from] ProviderError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for EbookError {
    fn into_response(self) -> Response {
        match &self {
            EbookError::Validation(ValidationError::UnknownEbookType(requested)) => {
                tracing::warn!(ebook_type = %requested, "Rejected unknown eBook type");
            }
            EbookError::Validation(err) => {
                tracing::warn!(error = %err, "Rejected malformed request");
            }
            EbookError::Delivery(err) => {
                tracing::error!(error = %err, "eBook delivery failed");
            }
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_message_is_fixed() {
        let err = EbookError::from(ValidationError::UnknownEbookType("nope".to_string()));
        assert_eq!(err.to_string(), "Invalid eBook type");
    }

    #[test]
    fn delivery_errors_keep_provider_message() {
        let err = EbookError::from(ProviderError::Connection("refused".to_string()));
        assert_eq!(err.to_string(), "Connection error: refused");
    }

    #[test]
    fn every_error_is_a_500() {
        let errors = [
            EbookError::from(ValidationError::MalformedBody("eof".to_string())),
            EbookError::from(ValidationError::UnknownEbookType("x".to_string())),
            EbookError::from(ProviderError::Rejected {
                status: 403,
                body: "{}".to_string(),
            }),
        ];

        for err in errors {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
