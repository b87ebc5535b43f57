//! PriceCache - Last known quote with a staleness ceiling.
//!
//! Readers never hit the price feed. A refresher task fetches on startup and
//! then on every interval; a failed fetch keeps the previous quote, which
//! ages until it passes the ceiling and stops being served.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::time::{self, MissedTickBehavior};

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::pricing::{Freshness, FreshnessPolicy, PriceQuote};
use crate::ports::PriceSource;

/// What a reader gets from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceView {
    Fresh(PriceQuote),

    /// Older than one refresh interval, still under the ceiling.
    Stale {
        quote: PriceQuote,
        age: chrono::Duration,
    },

    /// Nothing fetched yet, or the last quote passed the ceiling.
    Unavailable,
}

/// In-memory holder of the latest quote.
pub struct PriceCache {
    latest: RwLock<Option<PriceQuote>>,
    policy: FreshnessPolicy,
}

impl PriceCache {
    pub fn new(policy: FreshnessPolicy) -> Self {
        Self {
            latest: RwLock::new(None),
            policy,
        }
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }

    /// Replace the cached quote.
    pub async fn store(&self, quote: PriceQuote) {
        *self.latest.write().await = Some(quote);
    }

    /// Read the cached quote as seen at `now`.
    pub async fn read(&self, now: Timestamp) -> PriceView {
        let guard = self.latest.read().await;
        let quote = match guard.as_ref() {
            Some(quote) => quote,
            None => return PriceView::Unavailable,
        };

        match quote.freshness(now, &self.policy) {
            Freshness::Fresh => PriceView::Fresh(quote.clone()),
            Freshness::Stale { age } => PriceView::Stale {
                quote: quote.clone(),
                age,
            },
            Freshness::Expired { age } => {
                tracing::warn!(age_secs = age.num_seconds(), "Cached price past staleness ceiling");
                PriceView::Unavailable
            }
        }
    }
}

/// Background task that keeps a `PriceCache` populated.
pub struct PriceRefresher {
    source: Arc<dyn PriceSource>,
    cache: Arc<PriceCache>,
    interval: Duration,
}

impl PriceRefresher {
    pub fn new(source: Arc<dyn PriceSource>, cache: Arc<PriceCache>, interval: Duration) -> Self {
        Self {
            source,
            cache,
            interval,
        }
    }

    /// Fetch once and store the result.
    pub async fn refresh_once(&self) -> Result<PriceQuote, DomainError> {
        let quote = self.source.fetch_quote().await?;
        self.cache.store(quote.clone()).await;
        tracing::info!(asset = %quote.asset, usd_cents = quote.usd_cents, "Price updated");
        Ok(quote)
    }

    /// Refresh immediately, then on every interval until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Price refresher stopping");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.refresh_once().await {
                        tracing::warn!(error = %e, "Price update failed");
                    }
                }
            }
        }
    }
}
