//! Axum router configuration.

use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::PAYMENT_SUCCESS_PATH;

use super::handlers::{handle_paystack_webhook, handle_telegram_update, health, payment_success};
use super::state::AppState;

const TELEGRAM_PREFIX: &str = "/telegram/";

/// Create the application router.
///
/// # Routes
/// - `GET /` - Health check
/// - `POST /paystack/webhook` - Payment events (signature verified)
/// - `GET /payment-success` - Checkout landing page
/// - `POST /telegram/:token` - Bot updates (secret path segment)
pub fn app_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/paystack/webhook", post(handle_paystack_webhook))
        .route(PAYMENT_SUCCESS_PATH, get(payment_success))
        .route("/telegram/:token", post(handle_telegram_update))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %loggable_path(request.uri().path()),
                )
            }),
        )
        .with_state(state)
}

/// Request path as it may appear in logs. The Telegram path segment is the
/// bot token and never leaves the process.
fn loggable_path(path: &str) -> &str {
    if path.starts_with(TELEGRAM_PREFIX) {
        "/telegram/:token"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telegram_token_is_redacted() {
        assert_eq!(loggable_path("/telegram/123456:AAH-secret"), "/telegram/:token");
        assert_eq!(loggable_path("/telegram/123456:AAH-secret/extra"), "/telegram/:token");
    }

    #[test]
    fn other_paths_are_kept() {
        assert_eq!(loggable_path("/paystack/webhook"), "/paystack/webhook");
        assert_eq!(loggable_path("/"), "/");
    }
}
