//! PostgreSQL implementation of MembershipStore.
//!
//! `record_payment` runs in one transaction: make sure the row exists, lock it
//! with `SELECT ... FOR UPDATE`, claim the reference in `processed_payments`,
//! apply the domain transition and write it back. A concurrent delivery of the
//! same reference blocks on the row lock and then finds the reference claimed.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, ExternalUserId, Timestamp};
use crate::domain::membership::{
    MembershipRecord, MembershipStatus, PaymentOutcome, PaymentReference, RevokeGuard,
    RevokeOutcome,
};
use crate::ports::MembershipStore;

/// PostgreSQL implementation of the MembershipStore port.
pub struct PostgresMembershipStore {
    pool: PgPool,
}

impl PostgresMembershipStore {
    /// Creates a new PostgresMembershipStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a membership.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    user_id: String,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    last_payment_reference: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for MembershipRecord {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(MembershipRecord {
            user_id: ExternalUserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            status: MembershipStatus::from_flag(row.is_active),
            expires_at: row.expires_at.map(Timestamp::from_datetime),
            last_payment_reference: row.last_payment_reference,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

const SELECT_COLUMNS: &str =
    "user_id, is_active, expires_at, last_payment_reference, created_at, updated_at";

#[async_trait]
impl MembershipStore for PostgresMembershipStore {
    async fn find(&self, user_id: &ExternalUserId) -> Result<Option<MembershipRecord>, DomainError> {
        let row: Option<MembershipRow> = sqlx::query_as(&format!(
            "SELECT {} FROM memberships WHERE user_id = $1",
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find membership", e))?;

        row.map(MembershipRecord::try_from).transpose()
    }

    async fn ensure_user(&self, user_id: &ExternalUserId, now: Timestamp) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, is_active, created_at, updated_at)
            VALUES ($1, FALSE, $2, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to register user", e))?;

        Ok(())
    }

    async fn record_payment(
        &self,
        user_id: &ExternalUserId,
        reference: &PaymentReference,
        now: Timestamp,
        period: Duration,
    ) -> Result<PaymentOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        // 1. Upsert identity
        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, is_active, created_at, updated_at)
            VALUES ($1, FALSE, $2, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to upsert membership", e))?;

        // 2. Lock the row
        let row: MembershipRow = sqlx::query_as(&format!(
            "SELECT {} FROM memberships WHERE user_id = $1 FOR UPDATE",
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to lock membership", e))?;

        // 3. Claim the reference
        let claimed = sqlx::query(
            r#"
            INSERT INTO processed_payments (reference, user_id, applied_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (reference) DO NOTHING
            "#,
        )
        .bind(reference.as_str())
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to claim payment reference", e))?
        .rows_affected();

        if claimed == 0 {
            tx.rollback()
                .await
                .map_err(|e| db_error("Failed to release lock", e))?;
            return Ok(PaymentOutcome::Duplicate);
        }

        // 4. Apply the transition
        let mut record = MembershipRecord::try_from(row)?;
        let outcome = record.apply_payment(reference, now, period)?;

        if outcome == PaymentOutcome::Duplicate {
            tx.rollback()
                .await
                .map_err(|e| db_error("Failed to release lock", e))?;
            return Ok(outcome);
        }

        // 5. Write back
        sqlx::query(
            r#"
            UPDATE memberships SET
                is_active = $2,
                expires_at = $3,
                last_payment_reference = $4,
                updated_at = $5
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .bind(record.is_active())
        .bind(record.expires_at.map(|e| *e.as_datetime()))
        .bind(&record.last_payment_reference)
        .bind(record.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to update membership", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit payment", e))?;

        Ok(outcome)
    }

    async fn revoke(
        &self,
        user_id: &ExternalUserId,
        guard: RevokeGuard,
        now: Timestamp,
    ) -> Result<RevokeOutcome, DomainError> {
        let as_of: Option<DateTime<Utc>> = match guard {
            RevokeGuard::Unconditional => None,
            RevokeGuard::ExpiredAsOf(ts) => Some(*ts.as_datetime()),
        };

        let result = sqlx::query(
            r#"
            UPDATE memberships SET
                is_active = FALSE,
                updated_at = $2
            WHERE user_id = $1
              AND is_active
              AND ($3::timestamptz IS NULL OR expires_at IS NULL OR expires_at <= $3)
            "#,
        )
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .bind(as_of)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to revoke membership", e))?;

        Ok(if result.rows_affected() > 0 {
            RevokeOutcome::Revoked
        } else {
            RevokeOutcome::NoOp
        })
    }

    async fn find_expired_active(&self, now: Timestamp) -> Result<Vec<MembershipRecord>, DomainError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(&format!(
            "SELECT {} FROM memberships WHERE is_active AND expires_at < $1 ORDER BY expires_at",
            SELECT_COLUMNS
        ))
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find expired memberships", e))?;

        rows.into_iter().map(MembershipRecord::try_from).collect()
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Database unreachable", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(is_active: bool, expires_at: Option<DateTime<Utc>>) -> MembershipRow {
        let now = Utc::now();
        MembershipRow {
            user_id: "555".to_string(),
            is_active,
            expires_at,
            last_payment_reference: Some("VIP_555_1000".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_maps_to_record() {
        let expiry = Utc::now();
        let record = MembershipRecord::try_from(row(true, Some(expiry))).unwrap();

        assert_eq!(record.user_id.as_str(), "555");
        assert_eq!(record.status, MembershipStatus::Active);
        assert_eq!(record.expires_at, Some(Timestamp::from_datetime(expiry)));
        assert_eq!(record.last_payment_reference.as_deref(), Some("VIP_555_1000"));
    }

    #[test]
    fn inactive_row_without_expiry_maps() {
        let record = MembershipRecord::try_from(row(false, None)).unwrap();
        assert_eq!(record.status, MembershipStatus::Inactive);
        assert!(record.expires_at.is_none());
    }

    #[test]
    fn empty_user_id_is_database_error() {
        let mut bad = row(false, None);
        bad.user_id = String::new();

        let err = MembershipRecord::try_from(bad).unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
