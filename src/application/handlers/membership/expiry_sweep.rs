//! ExpirySweep - Background service that revokes lapsed memberships.
//!
//! On every tick: find records flagged active whose expiry has passed, revoke
//! each, then remove the user from the VIP group and tell them. Side effects
//! run after the revoke has committed and their failures are only counted.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 1h | Time between sweeps |
//!
//! ## Overlap
//!
//! Missed ticks are skipped, not queued, and `run_once` refuses to start while
//! another sweep holds the guard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::{self, MissedTickBehavior};

use crate::domain::foundation::Timestamp;
use crate::domain::membership::{MembershipError, RevokeOutcome};
use crate::ports::{Messenger, OutgoingMessage};

use super::MembershipController;

pub const EXPIRED_NOTICE: &str = "Your VIP has expired ⏰ Renew to continue.";

/// Configuration for the sweep.
#[derive(Debug, Clone)]
pub struct ExpirySweepConfig {
    pub interval: Duration,
}

impl Default for ExpirySweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
        }
    }
}

/// What one sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records returned by the expiry query.
    pub matched: usize,
    /// Records this sweep switched to inactive.
    pub revoked: usize,
    /// Records whose revoke failed.
    pub failed: usize,
    /// Group removals and notices that failed after a successful revoke.
    pub side_effect_failures: usize,
}

/// Background expiry sweep.
pub struct ExpirySweep {
    controller: Arc<MembershipController>,
    messenger: Arc<dyn Messenger>,
    config: ExpirySweepConfig,
    in_flight: Mutex<()>,
}

impl ExpirySweep {
    pub fn new(
        controller: Arc<MembershipController>,
        messenger: Arc<dyn Messenger>,
        config: ExpirySweepConfig,
    ) -> Self {
        Self {
            controller,
            messenger,
            config,
            in_flight: Mutex::new(()),
        }
    }

    /// Run the sweep loop until shutdown signal is received.
    ///
    /// The first sweep runs immediately. A failed sweep is logged and the loop
    /// carries on with the next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Expiry sweep stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    match self.run_once(Timestamp::now()).await {
                        Ok(Some(report)) if report.matched > 0 => {
                            tracing::info!(
                                matched = report.matched,
                                revoked = report.revoked,
                                failed = report.failed,
                                side_effect_failures = report.side_effect_failures,
                                "Expired VIPs removed"
                            );
                        }
                        Ok(Some(_)) => tracing::debug!("Expiry sweep found nothing"),
                        Ok(None) => tracing::warn!("Previous expiry sweep still running, tick skipped"),
                        Err(e) => tracing::error!(error = %e, "Expiry sweep failed"),
                    }
                }
            }
        }
    }

    /// Run exactly one sweep at `now`.
    ///
    /// Returns `None` without doing anything if another sweep is in flight.
    pub async fn run_once(&self, now: Timestamp) -> Result<Option<SweepReport>, MembershipError> {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => return Ok(None),
        };

        let expired = self.controller.find_expired(now).await?;
        let mut report = SweepReport {
            matched: expired.len(),
            ..SweepReport::default()
        };

        for record in expired {
            let user_id = record.user_id;

            match self.controller.revoke_expired(&user_id, now).await {
                Ok(RevokeOutcome::Revoked) => report.revoked += 1,
                Ok(RevokeOutcome::NoOp) => {
                    tracing::debug!(user_id = %user_id, "Membership renewed or revoked since query");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Failed to revoke expired membership");
                    report.failed += 1;
                    continue;
                }
            }

            if let Err(e) = self.messenger.remove_from_group(&user_id).await {
                tracing::warn!(user_id = %user_id, error = %e, "Group removal error");
                report.side_effect_failures += 1;
            }

            let notice = OutgoingMessage::text(user_id.as_str(), EXPIRED_NOTICE);
            if let Err(e) = self.messenger.send_message(&notice).await {
                tracing::warn!(user_id = %user_id, error = %e, "Expiry notice failed");
                report.side_effect_failures += 1;
            }
        }

        Ok(Some(report))
    }
}
