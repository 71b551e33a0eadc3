use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::error::{EbookError, ValidationError};
use crate::models::SendEbookRequest;
use crate::services::{
    record_ebook_request, render_ebook_email, EmailMessage, ProviderResponse,
};
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct SendEbookResponse {
    pub success: bool,
    /// Provider acknowledgement, passed through unchanged.
    pub data: Value,
}

/// `POST /send-ebook`
///
/// The body is decoded as JSON whatever its `Content-Type`, since browser
/// forms commonly post it as `text/plain` to avoid a preflight.
#[tracing::instrument(skip(state, body))]
pub async fn send_ebook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SendEbookResponse>, EbookError> {
    let response = handle_notification_request(&state, &body).await?;

    Ok(Json(SendEbookResponse {
        success: true,
        data: response.payload,
    }))
}

/// Decode, resolve, render and submit one eBook notification.
///
/// Input errors return before the provider is contacted. The provider is
/// called at most once and never retried.
pub async fn handle_notification_request(
    state: &AppState,
    body: &[u8],
) -> Result<ProviderResponse, EbookError> {
    let request = decode_request(body).inspect_err(|_| {
        record_ebook_request("unknown", "malformed");
    })?;

    let Some(record) = state.catalog.get(&request.ebook_type) else {
        record_ebook_request("unknown", "invalid_type");
        return Err(ValidationError::UnknownEbookType(request.ebook_type).into());
    };

    let message = EmailMessage {
        from: state.sender.mailbox(),
        to: vec![request.email],
        subject: record.subject.clone(),
        html: render_ebook_email(&request.name, record),
    };

    match state.email_provider.send(&message).await {
        Ok(response) => {
            record_ebook_request(&record.key, "sent");
            tracing::info!(
                ebook_type = %record.key,
                provider = state.email_provider.name(),
                provider_id = ?response.provider_id,
                "eBook email sent"
            );
            Ok(response)
        }
        Err(e) => {
            record_ebook_request(&record.key, "provider_error");
            Err(e.into())
        }
    }
}

fn decode_request(body: &[u8]) -> Result<SendEbookRequest, ValidationError> {
    let request: SendEbookRequest = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    request
        .validate()
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    Ok(request)
}
