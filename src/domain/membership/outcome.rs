//! Results of membership lifecycle operations.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

/// Result of applying a payment to a membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// First period, or a fresh period after a lapse.
    Activated { expires_at: Timestamp },

    /// Renewal stacked onto a still-running period.
    Extended {
        previous_expires_at: Timestamp,
        expires_at: Timestamp,
    },

    /// The reference was already applied. Nothing changed.
    Duplicate,

    /// The payment does not qualify. Nothing changed.
    Rejected { reason: RejectReason },
}

impl PaymentOutcome {
    /// New expiry if this outcome granted time.
    pub fn granted_until(&self) -> Option<Timestamp> {
        match self {
            PaymentOutcome::Activated { expires_at }
            | PaymentOutcome::Extended { expires_at, .. } => Some(*expires_at),
            PaymentOutcome::Duplicate | PaymentOutcome::Rejected { .. } => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentOutcome::Activated { .. } => "activated",
            PaymentOutcome::Extended { .. } => "extended",
            PaymentOutcome::Duplicate => "duplicate",
            PaymentOutcome::Rejected { .. } => "rejected",
        }
    }
}

/// Why a payment was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Paid less than the fixed price (minor units).
    AmountBelowPrice { expected: i64, received: i64 },

    /// Paid in a currency other than the one the price is set in.
    CurrencyMismatch { expected: String, received: String },

    /// The reference was issued for someone else.
    UserMismatch { reference_user: String, claimed_user: String },
}

/// Result of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allowed { expires_at: Timestamp },
    Denied { reason: DenyReason },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed { .. })
    }
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NoRecord,
    NotVip,
    Expired,
}

/// Result of a revoke transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokeOutcome {
    Revoked,
    NoOp,
}

/// Precondition applied by the store when revoking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeGuard {
    /// Revoke whatever the expiry.
    Unconditional,

    /// Revoke only if the expiry is at or before the given instant, so a renewal
    /// that landed after the caller read the record survives.
    ExpiredAsOf(Timestamp),
}
