//! Membership record entity.
//!
//! One record per external user. Every state change goes through the pure
//! transitions on this type; store adapters load the record inside their atomic
//! unit, apply the transition and write the result back.
//!
//! # Invariants
//!
//! - `user_id` is unique across the store
//! - `Active` implies `expires_at` is present
//! - a payment reference equal to `last_payment_reference` is never applied twice;
//!   stores keep a ledger of every earlier reference
//! - an expiry is only ever moved forward by a payment

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ExternalUserId, StateMachine, Timestamp};

use super::{
    AccessDecision, DenyReason, MembershipError, MembershipStatus, PaymentOutcome,
    PaymentReference, RevokeGuard, RevokeOutcome,
};

/// Durable membership state of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub user_id: ExternalUserId,
    pub status: MembershipStatus,

    /// Kept after revocation as a historical marker.
    pub expires_at: Option<Timestamp>,

    /// Idempotency key of the most recently applied payment.
    pub last_payment_reference: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MembershipRecord {
    /// Record for a user seen for the first time.
    pub fn new_inactive(user_id: ExternalUserId, now: Timestamp) -> Self {
        Self {
            user_id,
            status: MembershipStatus::Inactive,
            expires_at: None,
            last_payment_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// True if the record is active and its period has not ended at `now`.
    pub fn has_running_period(&self, now: Timestamp) -> bool {
        self.is_active() && self.expires_at.map_or(false, |e| e.is_after(&now))
    }

    /// True if the record is flagged active but its period ended at or before `now`.
    pub fn is_lapsed(&self, now: Timestamp) -> bool {
        self.is_active() && self.expires_at.map_or(true, |e| !e.is_after(&now))
    }

    /// Read-only access decision at `now`.
    pub fn access_at(&self, now: Timestamp) -> AccessDecision {
        match (self.status, self.expires_at) {
            (MembershipStatus::Inactive, _) => AccessDecision::Denied {
                reason: DenyReason::NotVip,
            },
            (MembershipStatus::Active, Some(expires_at)) if expires_at.is_after(&now) => {
                AccessDecision::Allowed { expires_at }
            }
            (MembershipStatus::Active, _) => AccessDecision::Denied {
                reason: DenyReason::Expired,
            },
        }
    }

    /// Applies a qualifying payment.
    ///
    /// The new expiry is `period` after the later of `now` and the current
    /// expiry, so an early renewal stacks and a late one starts from `now`.
    pub fn apply_payment(
        &mut self,
        reference: &PaymentReference,
        now: Timestamp,
        period: Duration,
    ) -> Result<PaymentOutcome, MembershipError> {
        if self.last_payment_reference.as_deref() == Some(reference.as_str()) {
            return Ok(PaymentOutcome::Duplicate);
        }

        let running = self.has_running_period(now);
        let base = self.expires_at.map_or(now, |current| current.later_of(now));
        let expires_at = base.plus(period);

        let from = self.status;
        self.status = from
            .transition_to(MembershipStatus::Active)
            .map_err(|e| MembershipError::invalid_state(format!("{:?}", from), e.to_string()))?;
        let previous = self.expires_at.replace(expires_at);
        self.last_payment_reference = Some(reference.as_str().to_string());
        self.updated_at = now;

        Ok(match previous {
            Some(previous_expires_at) if running => PaymentOutcome::Extended {
                previous_expires_at,
                expires_at,
            },
            _ => PaymentOutcome::Activated { expires_at },
        })
    }

    /// Clears the VIP flag, leaving `expires_at` untouched.
    pub fn revoke(&mut self, guard: RevokeGuard, now: Timestamp) -> RevokeOutcome {
        if !self.is_active() {
            return RevokeOutcome::NoOp;
        }

        if let RevokeGuard::ExpiredAsOf(as_of) = guard {
            if self.expires_at.map_or(false, |e| e.is_after(&as_of)) {
                return RevokeOutcome::NoOp;
            }
        }

        self.status = MembershipStatus::Inactive;
        self.updated_at = now;
        RevokeOutcome::Revoked
    }
}
