//! In-memory implementation of MembershipStore.
//!
//! A single write lock over the records and the applied-reference ledger makes
//! each mutating call one atomic unit, so concurrent deliveries of the same
//! reference are serialised and the second one finds it in the ledger.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ExternalUserId, Timestamp};
use crate::domain::membership::{
    MembershipRecord, PaymentOutcome, PaymentReference, RevokeGuard, RevokeOutcome,
};
use crate::ports::MembershipStore;

#[derive(Default)]
struct State {
    records: HashMap<ExternalUserId, MembershipRecord>,
    /// Every payment reference ever applied.
    processed: HashSet<String>,
}

/// Membership store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryMembershipStore {
    state: RwLock<State>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.records.is_empty()
    }

    /// Insert or replace a record as-is.
    ///
    /// The record's last reference joins the ledger, as it would have had it
    /// been applied through `record_payment`.
    pub async fn insert(&self, record: MembershipRecord) {
        let mut state = self.state.write().await;
        if let Some(reference) = &record.last_payment_reference {
            state.processed.insert(reference.clone());
        }
        state.records.insert(record.user_id.clone(), record);
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn find(&self, user_id: &ExternalUserId) -> Result<Option<MembershipRecord>, DomainError> {
        Ok(self.state.read().await.records.get(user_id).cloned())
    }

    async fn ensure_user(&self, user_id: &ExternalUserId, now: Timestamp) -> Result<(), DomainError> {
        self.state
            .write()
            .await
            .records
            .entry(user_id.clone())
            .or_insert_with(|| MembershipRecord::new_inactive(user_id.clone(), now));
        Ok(())
    }

    async fn record_payment(
        &self,
        user_id: &ExternalUserId,
        reference: &PaymentReference,
        now: Timestamp,
        period: Duration,
    ) -> Result<PaymentOutcome, DomainError> {
        let mut state = self.state.write().await;
        let State { records, processed } = &mut *state;

        if processed.contains(reference.as_str()) {
            return Ok(PaymentOutcome::Duplicate);
        }

        let record = records
            .entry(user_id.clone())
            .or_insert_with(|| MembershipRecord::new_inactive(user_id.clone(), now));

        let mut updated = record.clone();
        let outcome = updated.apply_payment(reference, now, period)?;
        *record = updated;
        processed.insert(reference.as_str().to_string());
        Ok(outcome)
    }

    async fn revoke(
        &self,
        user_id: &ExternalUserId,
        guard: RevokeGuard,
        now: Timestamp,
    ) -> Result<RevokeOutcome, DomainError> {
        let mut state = self.state.write().await;
        Ok(match state.records.get_mut(user_id) {
            Some(record) => record.revoke(guard, now),
            None => RevokeOutcome::NoOp,
        })
    }

    async fn find_expired_active(&self, now: Timestamp) -> Result<Vec<MembershipRecord>, DomainError> {
        let state = self.state.read().await;
        let mut expired: Vec<MembershipRecord> = state
            .records
            .values()
            .filter(|r| r.is_active() && r.expires_at.map_or(false, |e| e.is_before(&now)))
            .cloned()
            .collect();
        expired.sort_by(|a, b| a.expires_at.cmp(&b.expires_at));
        Ok(expired)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
