//! Membership-specific error types.
//!
//! Errors raised by the lifecycle controller and the bot command flow.
//! Rejected payments and duplicate deliveries are outcomes, not errors.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidReference | 400 |
//! | ValidationFailed | 400 |
//! | InvalidState | 409 |
//! | PaymentProvider | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// Payment reference does not carry an extractable user id.
    InvalidReference { reference: String, reason: String },

    /// Invalid state for the requested operation.
    InvalidState { current: String, attempted: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Payment provider could not create a checkout session.
    PaymentProvider(String),

    /// Store unavailable or failed.
    Infrastructure(String),
}

impl MembershipError {
    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        MembershipError::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MembershipError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn payment_provider(message: impl Into<String>) -> Self {
        MembershipError::PaymentProvider(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::InvalidReference { .. } => ErrorCode::InvalidFormat,
            MembershipError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::PaymentProvider(_) => ErrorCode::UpstreamUnavailable,
            MembershipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a message suitable for logs.
    pub fn message(&self) -> String {
        match self {
            MembershipError::InvalidReference { reference, reason } => {
                format!("Invalid payment reference '{}': {}", reference, reason)
            }
            MembershipError::InvalidState { current, attempted } => {
                format!("Cannot {} membership in {} state", attempted, current)
            }
            MembershipError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MembershipError::PaymentProvider(msg) => format!("Payment provider error: {}", msg),
            MembershipError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the caller may retry later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MembershipError::Infrastructure(_) | MembershipError::PaymentProvider(_)
        )
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MembershipError {}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => {
                MembershipError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            ErrorCode::UpstreamUnavailable | ErrorCode::UpstreamRejected => {
                MembershipError::PaymentProvider(err.to_string())
            }
            _ => MembershipError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyField { field } => {
                MembershipError::validation(field, "cannot be empty")
            }
            ValidationError::InvalidFormat { field, reason } => {
                MembershipError::validation(field, reason)
            }
        }
    }
}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infrastructure_is_retryable() {
        assert!(MembershipError::infrastructure("db down").is_retryable());
        assert!(MembershipError::payment_provider("timeout").is_retryable());
    }

    #[test]
    fn reference_and_validation_errors_are_not_retryable() {
        assert!(!MembershipError::invalid_reference("X_1", "bad prefix").is_retryable());
        assert!(!MembershipError::validation("amount", "negative").is_retryable());
    }

    #[test]
    fn database_domain_error_maps_to_infrastructure() {
        let err: MembershipError = DomainError::database("connection reset").into();
        assert!(matches!(err, MembershipError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn upstream_domain_error_maps_to_payment_provider() {
        let err: MembershipError = DomainError::upstream("paystack timeout").into();
        assert!(matches!(err, MembershipError::PaymentProvider(_)));
    }

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: MembershipError = DomainError::validation("user_id", "empty").into();
        assert_eq!(
            err,
            MembershipError::ValidationFailed {
                field: "user_id".to_string(),
                message: "empty".to_string()
            }
        );
    }

    #[test]
    fn display_uses_message() {
        let err = MembershipError::invalid_reference("ABC", "expected prefix 'VIP'");
        assert_eq!(
            err.to_string(),
            "Invalid payment reference 'ABC': expected prefix 'VIP'"
        );
    }

    #[test]
    fn converts_into_domain_error() {
        let err: DomainError = MembershipError::infrastructure("boom").into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
