//! Pricing domain module.
//!
//! A price quote remembers when it was fetched so readers can tell how old it
//! is. Quotes older than the staleness ceiling are never served.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Last known spot price of an asset, in US cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub asset: String,
    pub usd_cents: i64,
    pub fetched_at: Timestamp,
}

impl PriceQuote {
    /// Creates a quote from a provider's dollar figure.
    pub fn from_usd(
        asset: impl Into<String>,
        usd: f64,
        fetched_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if !usd.is_finite() || usd <= 0.0 {
            return Err(ValidationError::invalid_format(
                "price",
                format!("must be a positive number, got {}", usd),
            ));
        }

        Ok(Self {
            asset: asset.into(),
            usd_cents: (usd * 100.0).round() as i64,
            fetched_at,
        })
    }

    /// Price formatted as dollars with cents, e.g. `$67,123.45`.
    pub fn display_usd(&self) -> String {
        let dollars = self.usd_cents / 100;
        let cents = self.usd_cents % 100;

        let digits = dollars.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("${}.{:02}", grouped, cents)
    }

    /// Classifies the quote's age at `now`.
    pub fn freshness(&self, now: Timestamp, policy: &FreshnessPolicy) -> Freshness {
        let age = now.duration_since(&self.fetched_at);
        if age <= policy.refresh_interval {
            Freshness::Fresh
        } else if age <= policy.max_staleness {
            Freshness::Stale { age }
        } else {
            Freshness::Expired { age }
        }
    }
}

/// How old a quote may get before it is flagged or withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub refresh_interval: Duration,
    pub max_staleness: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::minutes(10),
            max_staleness: Duration::minutes(30),
        }
    }
}

/// Age class of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,

    /// Older than one refresh interval. Served with a note.
    Stale { age: Duration },

    /// Past the ceiling. Treated as unavailable.
    Expired { age: Duration },
}

impl Freshness {
    pub fn is_servable(&self) -> bool {
        !matches!(self, Freshness::Expired { .. })
    }
}
