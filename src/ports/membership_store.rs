//! Membership store port.
//!
//! The store is the only shared mutable resource. Every mutating operation is a
//! single atomic unit: adapters load the record, apply the pure transition from
//! `MembershipRecord` and write it back without another writer interleaving.
//!
//! # Example
//!
//! ```ignore
//! let outcome = store
//!     .record_payment(&user_id, &reference, Timestamp::now(), Duration::days(30))
//!     .await?;
//!
//! if let Some(expires_at) = outcome.granted_until() {
//!     messenger.send_message(&OutgoingMessage::text(user_id.as_str(), "VIP Activated")).await.ok();
//! }
//! ```

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::foundation::{DomainError, ExternalUserId, Timestamp};
use crate::domain::membership::{
    MembershipRecord, PaymentOutcome, PaymentReference, RevokeGuard, RevokeOutcome,
};

/// Persistence port for membership records.
///
/// Implementations must ensure:
/// - One record per `user_id`
/// - A payment reference is applied at most once, in any delivery order, and
///   two concurrent `record_payment` calls with it cannot both extend the expiry
/// - Store errors are reported as `DatabaseError`
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Find the record for a user.
    ///
    /// Returns `None` if the user has never been seen.
    async fn find(&self, user_id: &ExternalUserId) -> Result<Option<MembershipRecord>, DomainError>;

    /// Create an inactive record on first contact.
    ///
    /// Existing records are left untouched.
    async fn ensure_user(&self, user_id: &ExternalUserId, now: Timestamp) -> Result<(), DomainError>;

    /// Atomically apply a payment.
    ///
    /// Creates the record if missing, returns `Duplicate` without writing if
    /// `reference` was ever applied before, otherwise activates or extends.
    async fn record_payment(
        &self,
        user_id: &ExternalUserId,
        reference: &PaymentReference,
        now: Timestamp,
        period: Duration,
    ) -> Result<PaymentOutcome, DomainError>;

    /// Clear the VIP flag, subject to `guard`.
    ///
    /// Returns `NoOp` if the record is missing, already inactive, or the guard
    /// does not hold.
    async fn revoke(
        &self,
        user_id: &ExternalUserId,
        guard: RevokeGuard,
        now: Timestamp,
    ) -> Result<RevokeOutcome, DomainError>;

    /// Records flagged active whose expiry is strictly before `now`.
    async fn find_expired_active(&self, now: Timestamp) -> Result<Vec<MembershipRecord>, DomainError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), DomainError>;
}
