//! Webhook error types for payment provider notifications.
//!
//! Every condition the webhook endpoint can hit, with the HTTP status the
//! provider should see. Only authentication failures are rejected and only
//! store failures ask for a retry; everything else is acknowledged so the
//! provider does not redeliver an event that can never succeed.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header absent.
    #[error("Missing signature")]
    MissingSignature,

    /// Signature header present but does not match the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Authenticated payload could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Reference does not carry an extractable user id.
    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    /// Membership store failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the provider should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// Maps the error to the HTTP status returned to the provider.
    ///
    /// - 401: authentication failed, no mutation
    /// - 500: store failure, the provider retries
    /// - 200: everything else is acknowledged
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }

            WebhookError::ParseError(_) | WebhookError::MalformedReference(_) => StatusCode::OK,

            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Error Display Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn invalid_signature_displays_correctly() {
        assert_eq!(WebhookError::InvalidSignature.to_string(), "Invalid signature");
    }

    #[test]
    fn malformed_reference_displays_reference() {
        let err = WebhookError::MalformedReference("ABC_1".to_string());
        assert_eq!(err.to_string(), "Malformed reference: ABC_1");
    }

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn authentication_failures_are_unauthorized() {
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn unrecoverable_payloads_are_acknowledged() {
        assert_eq!(
            WebhookError::ParseError("eof".to_string()).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            WebhookError::MalformedReference("x".to_string()).status_code(),
            StatusCode::OK
        );
    }

    #[test]
    fn database_error_asks_for_retry() {
        let err = WebhookError::Database("pool timed out".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_retryable());
    }

    #[test]
    fn only_database_errors_are_retryable() {
        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::ParseError("x".to_string()).is_retryable());
        assert!(!WebhookError::MalformedReference("x".to_string()).is_retryable());
    }
}
