//! HTTP handlers.
//!
//! Thin translation between axum requests and the application handlers.

use axum::body::Bytes;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::adapters::telegram::Update;
use crate::application::handlers::membership::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookResult,
};
use crate::domain::membership::{WebhookError, SIGNATURE_HEADER};

use super::dto::{ErrorResponse, HEALTHY, PAYMENT_SUCCESS_HTML};
use super::state::AppState;

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, HEALTHY).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            let body = ErrorResponse::new("STORE_UNAVAILABLE", "Membership store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment provider
// ════════════════════════════════════════════════════════════════════════════════

/// POST /paystack/webhook - Handle Paystack events
pub async fn handle_paystack_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.webhook_handler.handle(cmd).await? {
        HandlePaymentWebhookResult::Processed { user_id, outcome } => {
            tracing::info!(user_id = %user_id, outcome = outcome.label(), "Payment webhook processed");
        }
        HandlePaymentWebhookResult::Ignored { event_type } => {
            tracing::debug!(event_type = %event_type, "Payment webhook ignored");
        }
    }

    Ok(StatusCode::OK)
}

/// GET /payment-success - Landing page after checkout
pub async fn payment_success() -> Html<&'static str> {
    Html(PAYMENT_SUCCESS_HTML)
}

// ════════════════════════════════════════════════════════════════════════════════
// Chat platform
// ════════════════════════════════════════════════════════════════════════════════

/// POST /telegram/:token - Bot updates
///
/// Acknowledges as soon as the update is decoded; the interaction runs on its
/// own task so slow collaborators never delay the platform's delivery queue.
pub async fn handle_telegram_update(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> StatusCode {
    if !state.is_telegram_token(&token) {
        tracing::warn!("Telegram webhook called with wrong token");
        return StatusCode::UNAUTHORIZED;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!(error = %e, "Undecodable Telegram update");
            return StatusCode::OK;
        }
    };
    let update_id = update.update_id;

    if let Some(input) = update.into_bot_input() {
        let handler = state.bot_handler.clone();
        tokio::spawn(async move {
            handler.handle(input).await;
        });
    } else {
        tracing::debug!(update_id, "Ignoring Telegram update");
    }

    StatusCode::OK
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Converts webhook failures to the status the provider should see.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        let code = match &self.0 {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                tracing::warn!(error = %self.0, "Rejected payment webhook");
                "INVALID_WEBHOOK_SIGNATURE"
            }
            WebhookError::ParseError(_) | WebhookError::MalformedReference(_) => {
                tracing::warn!(error = %self.0, "Acknowledged unusable payment webhook");
                "WEBHOOK_UNUSABLE"
            }
            WebhookError::Database(_) => {
                tracing::error!(error = %self.0, "Payment webhook failed, provider will retry");
                "INTERNAL_ERROR"
            }
        };

        if status.is_success() {
            return status.into_response();
        }

        // Do not echo internals back to the caller
        let message = match status {
            StatusCode::UNAUTHORIZED => "Webhook signature verification failed",
            _ => "Webhook could not be processed",
        };
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
