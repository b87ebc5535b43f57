//! MembershipController - Lifecycle operations on VIP memberships.
//!
//! Decides whether a payment activates, extends or is rejected, answers access
//! checks, and drives revocation. State lives in the store only; the controller
//! is constructed once at startup and shared by every handler.

use std::sync::Arc;

use chrono::Duration;

use crate::domain::foundation::{ExternalUserId, Timestamp};
use crate::domain::membership::{
    AccessDecision, DenyReason, MembershipError, MembershipRecord, PaymentOutcome,
    PaymentReference, RejectReason, RevokeGuard, RevokeOutcome, DEFAULT_REFERENCE_PREFIX,
};
use crate::ports::MembershipStore;

/// The single product: one price, one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipPolicy {
    /// Fixed price in minor units.
    pub price_minor_units: i64,
    /// ISO 4217 code the price is charged in.
    pub currency: String,
    pub period: Duration,
    pub reference_prefix: String,
}

impl Default for MembershipPolicy {
    fn default() -> Self {
        Self {
            price_minor_units: 200_000,
            currency: "NGN".to_string(),
            period: Duration::days(30),
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
        }
    }
}

/// Controller for the membership lifecycle.
pub struct MembershipController {
    store: Arc<dyn MembershipStore>,
    policy: MembershipPolicy,
}

impl MembershipController {
    pub fn new(store: Arc<dyn MembershipStore>, policy: MembershipPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &MembershipPolicy {
        &self.policy
    }

    /// Applies a confirmed payment.
    ///
    /// Rejections never touch the store. Duplicate detection and the expiry
    /// computation happen inside the store's atomic unit. A charge without a
    /// currency is compared on amount alone.
    pub async fn record_payment(
        &self,
        reference: &PaymentReference,
        user_id: &ExternalUserId,
        amount_minor: i64,
        currency: Option<&str>,
        now: Timestamp,
    ) -> Result<PaymentOutcome, MembershipError> {
        if reference.user_id() != user_id {
            let outcome = PaymentOutcome::Rejected {
                reason: RejectReason::UserMismatch {
                    reference_user: reference.user_id().to_string(),
                    claimed_user: user_id.to_string(),
                },
            };
            tracing::warn!(reference = %reference, user_id = %user_id, "Payment reference issued for another user");
            return Ok(outcome);
        }

        if let Some(received) = currency {
            if !received.eq_ignore_ascii_case(&self.policy.currency) {
                tracing::warn!(
                    reference = %reference,
                    user_id = %user_id,
                    currency = received,
                    expected = %self.policy.currency,
                    "Payment in unexpected currency"
                );
                return Ok(PaymentOutcome::Rejected {
                    reason: RejectReason::CurrencyMismatch {
                        expected: self.policy.currency.clone(),
                        received: received.to_string(),
                    },
                });
            }
        }

        if amount_minor < self.policy.price_minor_units {
            tracing::warn!(
                reference = %reference,
                user_id = %user_id,
                amount = amount_minor,
                expected = self.policy.price_minor_units,
                "Payment below price"
            );
            return Ok(PaymentOutcome::Rejected {
                reason: RejectReason::AmountBelowPrice {
                    expected: self.policy.price_minor_units,
                    received: amount_minor,
                },
            });
        }

        let outcome = self
            .store
            .record_payment(user_id, reference, now, self.policy.period)
            .await?;

        tracing::info!(
            reference = %reference,
            user_id = %user_id,
            outcome = outcome.label(),
            "Payment recorded"
        );

        Ok(outcome)
    }

    /// Decides access at `now`.
    ///
    /// A lapsed record is revoked on the spot; if that revoke fails the
    /// decision is still a denial. Store errors propagate and callers must
    /// treat them as a denial.
    pub async fn check_access(
        &self,
        user_id: &ExternalUserId,
        now: Timestamp,
    ) -> Result<AccessDecision, MembershipError> {
        let record = match self.store.find(user_id).await? {
            Some(record) => record,
            None => {
                return Ok(AccessDecision::Denied {
                    reason: DenyReason::NoRecord,
                })
            }
        };

        let decision = record.access_at(now);

        if matches!(
            decision,
            AccessDecision::Denied {
                reason: DenyReason::Expired
            }
        ) {
            match self.store.revoke(user_id, RevokeGuard::ExpiredAsOf(now), now).await {
                Ok(outcome) => {
                    tracing::info!(user_id = %user_id, ?outcome, "Lazy expiry on access check")
                }
                Err(e) => tracing::warn!(user_id = %user_id, error = %e, "Lazy revoke failed"),
            }
        }

        Ok(decision)
    }

    /// Clears the VIP flag regardless of expiry.
    pub async fn revoke(
        &self,
        user_id: &ExternalUserId,
        now: Timestamp,
    ) -> Result<RevokeOutcome, MembershipError> {
        Ok(self
            .store
            .revoke(user_id, RevokeGuard::Unconditional, now)
            .await?)
    }

    /// Clears the VIP flag only if the membership has run out by `now`.
    pub async fn revoke_expired(
        &self,
        user_id: &ExternalUserId,
        now: Timestamp,
    ) -> Result<RevokeOutcome, MembershipError> {
        Ok(self
            .store
            .revoke(user_id, RevokeGuard::ExpiredAsOf(now), now)
            .await?)
    }

    /// Records flagged active whose period ended before `now`.
    pub async fn find_expired(&self, now: Timestamp) -> Result<Vec<MembershipRecord>, MembershipError> {
        Ok(self.store.find_expired_active(now).await?)
    }

    /// Registers a user on first contact.
    pub async fn register_user(
        &self,
        user_id: &ExternalUserId,
        now: Timestamp,
    ) -> Result<(), MembershipError> {
        Ok(self.store.ensure_user(user_id, now).await?)
    }

    /// New checkout reference for `user_id`.
    pub fn checkout_reference(
        &self,
        user_id: &ExternalUserId,
        now: Timestamp,
    ) -> Result<PaymentReference, MembershipError> {
        PaymentReference::for_checkout(&self.policy.reference_prefix, user_id, now)
            .map_err(|e| MembershipError::invalid_reference(user_id.as_str(), e.to_string()))
    }

    /// Parses a reference received from the provider.
    pub fn parse_reference(&self, raw: &str) -> Result<PaymentReference, MembershipError> {
        PaymentReference::parse(&self.policy.reference_prefix, raw)
            .map_err(|e| MembershipError::invalid_reference(raw, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMembershipStore;
    use crate::domain::foundation::DomainError;
    use crate::domain::membership::MembershipStatus;
    use async_trait::async_trait;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    fn user(id: &str) -> ExternalUserId {
        ExternalUserId::new(id).unwrap()
    }

    fn controller_with(store: Arc<InMemoryMembershipStore>) -> MembershipController {
        MembershipController::new(store, MembershipPolicy::default())
    }

    fn reference(raw: &str) -> PaymentReference {
        PaymentReference::parse("VIP", raw).unwrap()
    }

    /// Store whose every call fails.
    struct FailingStore;

    #[async_trait]
    impl MembershipStore for FailingStore {
        async fn find(&self, _: &ExternalUserId) -> Result<Option<MembershipRecord>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn ensure_user(&self, _: &ExternalUserId, _: Timestamp) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn record_payment(
            &self,
            _: &ExternalUserId,
            _: &PaymentReference,
            _: Timestamp,
            _: Duration,
        ) -> Result<PaymentOutcome, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn revoke(
            &self,
            _: &ExternalUserId,
            _: RevokeGuard,
            _: Timestamp,
        ) -> Result<RevokeOutcome, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn find_expired_active(&self, _: Timestamp) -> Result<Vec<MembershipRecord>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn ping(&self) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // record_payment
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fresh_reference_activates_for_thirty_days() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let controller = controller_with(store.clone());
        let now = Timestamp::now();

        let outcome = controller
            .record_payment(&reference("VIP_555_1000"), &user("555"), 200_000, Some("NGN"), now)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PaymentOutcome::Activated {
                expires_at: now.add_days(30)
            }
        );
        let record = store.find(&user("555")).await.unwrap().unwrap();
        assert_eq!(record.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn replay_is_duplicate() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let controller = controller_with(store.clone());
        let now = Timestamp::now();
        controller
            .record_payment(&reference("VIP_555_1000"), &user("555"), 200_000, Some("NGN"), now)
            .await
            .unwrap();

        for _ in 0..3 {
            let outcome = controller
                .record_payment(
                    &reference("VIP_555_1000"),
                    &user("555"),
                    200_000,
                    Some("NGN"),
                    now.add_days(1),
                )
                .await
                .unwrap();
            assert_eq!(outcome, PaymentOutcome::Duplicate);
        }

        let record = store.find(&user("555")).await.unwrap().unwrap();
        assert_eq!(record.expires_at, Some(now.add_days(30)));
    }

    #[tokio::test]
    async fn underpayment_is_rejected_without_writing() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let controller = controller_with(store.clone());

        let outcome = controller
            .record_payment(
                &reference("VIP_555_1000"),
                &user("555"),
                100,
                Some("NGN"),
                Timestamp::now(),
            )
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PaymentOutcome::Rejected {
                reason: RejectReason::AmountBelowPrice { .. }
            }
        ));
        assert!(store.find(&user("555")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn foreign_currency_is_rejected_without_writing() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let controller = controller_with(store.clone());

        let outcome = controller
            .record_payment(
                &reference("VIP_555_1000"),
                &user("555"),
                200_000,
                Some("USD"),
                Timestamp::now(),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PaymentOutcome::Rejected {
                reason: RejectReason::CurrencyMismatch {
                    expected: "NGN".to_string(),
                    received: "USD".to_string(),
                }
            }
        );
        assert!(store.find(&user("555")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn currency_match_ignores_case() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));

        let outcome = controller
            .record_payment(
                &reference("VIP_555_1000"),
                &user("555"),
                200_000,
                Some("ngn"),
                Timestamp::now(),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, PaymentOutcome::Activated { .. }));
    }

    #[tokio::test]
    async fn reference_for_other_user_is_rejected() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let controller = controller_with(store.clone());

        let outcome = controller
            .record_payment(
                &reference("VIP_555_1000"),
                &user("777"),
                200_000,
                Some("NGN"),
                Timestamp::now(),
            )
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PaymentOutcome::Rejected {
                reason: RejectReason::UserMismatch { .. }
            }
        ));
    }

    #[tokio::test]
    async fn store_failure_is_retryable_error() {
        let controller = MembershipController::new(Arc::new(FailingStore), MembershipPolicy::default());

        let err = controller
            .record_payment(
                &reference("VIP_555_1000"),
                &user("555"),
                200_000,
                Some("NGN"),
                Timestamp::now(),
            )
            .await
            .unwrap_err();

        assert!(err.is_retryable());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // check_access
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_user_is_denied_no_record() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));

        let decision = controller.check_access(&user("1"), Timestamp::now()).await.unwrap();

        assert_eq!(
            decision,
            AccessDecision::Denied {
                reason: DenyReason::NoRecord
            }
        );
    }

    #[tokio::test]
    async fn registered_user_is_denied_not_vip() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));
        let now = Timestamp::now();
        controller.register_user(&user("1"), now).await.unwrap();

        let decision = controller.check_access(&user("1"), now).await.unwrap();

        assert_eq!(
            decision,
            AccessDecision::Denied {
                reason: DenyReason::NotVip
            }
        );
    }

    #[tokio::test]
    async fn active_user_is_allowed() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));
        let now = Timestamp::now();
        controller
            .record_payment(&reference("VIP_1_5"), &user("1"), 200_000, Some("NGN"), now)
            .await
            .unwrap();

        let decision = controller.check_access(&user("1"), now.add_days(29)).await.unwrap();

        assert_eq!(
            decision,
            AccessDecision::Allowed {
                expires_at: now.add_days(30)
            }
        );
    }

    #[tokio::test]
    async fn lapsed_user_is_denied_expired_and_revoked() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let controller = controller_with(store.clone());
        let paid_at = Timestamp::now().minus_days(31);
        controller
            .record_payment(&reference("VIP_1_5"), &user("1"), 200_000, Some("NGN"), paid_at)
            .await
            .unwrap();

        let decision = controller.check_access(&user("1"), Timestamp::now()).await.unwrap();

        assert_eq!(
            decision,
            AccessDecision::Denied {
                reason: DenyReason::Expired
            }
        );
        let record = store.find(&user("1")).await.unwrap().unwrap();
        assert!(!record.is_active());
        assert_eq!(record.expires_at, Some(paid_at.add_days(30)));
    }

    #[tokio::test]
    async fn store_failure_on_access_check_is_error() {
        let controller = MembershipController::new(Arc::new(FailingStore), MembershipPolicy::default());

        let result = controller.check_access(&user("1"), Timestamp::now()).await;

        assert!(matches!(result, Err(MembershipError::Infrastructure(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // revoke
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn revoke_is_idempotent() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));
        let now = Timestamp::now();
        controller
            .record_payment(&reference("VIP_1_5"), &user("1"), 200_000, Some("NGN"), now)
            .await
            .unwrap();

        assert_eq!(controller.revoke(&user("1"), now).await.unwrap(), RevokeOutcome::Revoked);
        assert_eq!(controller.revoke(&user("1"), now).await.unwrap(), RevokeOutcome::NoOp);
        assert_eq!(controller.revoke(&user("2"), now).await.unwrap(), RevokeOutcome::NoOp);
    }

    #[tokio::test]
    async fn revoke_expired_spares_running_membership() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));
        let now = Timestamp::now();
        controller
            .record_payment(&reference("VIP_1_5"), &user("1"), 200_000, Some("NGN"), now)
            .await
            .unwrap();

        assert_eq!(
            controller.revoke_expired(&user("1"), now).await.unwrap(),
            RevokeOutcome::NoOp
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // References
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn malformed_reference_is_invalid_reference_error() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));

        let err = controller.parse_reference("garbage").unwrap_err();

        assert!(matches!(err, MembershipError::InvalidReference { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn checkout_reference_round_trips() {
        let controller = controller_with(Arc::new(InMemoryMembershipStore::new()));

        let built = controller.checkout_reference(&user("42"), Timestamp::now()).unwrap();
        let parsed = controller.parse_reference(built.as_str()).unwrap();

        assert_eq!(parsed.user_id(), &user("42"));
    }
}
