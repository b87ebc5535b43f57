//! Price feed configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::pricing::FreshnessPolicy;

use super::error::ValidationError;
use super::telegram::is_http_url;

/// Price feed configuration (CoinGecko)
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// `simple/price` URL including the query string
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Seconds between refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Seconds after which a cached quote is withheld
    #[serde(default = "default_max_staleness")]
    pub max_staleness_secs: u64,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PricingConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy {
            refresh_interval: chrono::Duration::seconds(self.refresh_interval_secs as i64),
            max_staleness: chrono::Duration::seconds(self.max_staleness_secs as i64),
        }
    }

    /// Validate pricing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.api_url) {
            return Err(ValidationError::InvalidUrl("pricing.api_url"));
        }
        // Free tier rate limits make anything tighter pointless
        if self.refresh_interval_secs < 30 || self.refresh_interval_secs > 86_400 {
            return Err(ValidationError::InvalidInterval("pricing.refresh_interval_secs"));
        }
        if self.max_staleness_secs < self.refresh_interval_secs
            || self.max_staleness_secs > 86_400 * 7
        {
            return Err(ValidationError::StalenessBelowRefresh);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("pricing.request_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            refresh_interval_secs: default_refresh_interval(),
            max_staleness_secs: default_max_staleness(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd".to_string()
}

fn default_refresh_interval() -> u64 {
    600
}

fn default_max_staleness() -> u64 {
    1800
}

fn default_request_timeout() -> u64 {
    10
}
