//! Membership lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Membership period and sweep schedule
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipConfig {
    /// Days of access one payment buys
    #[serde(default = "default_period_days")]
    pub period_days: i64,

    /// Seconds between expiry sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl MembershipConfig {
    pub fn period(&self) -> chrono::Duration {
        chrono::Duration::days(self.period_days)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate membership configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=3650).contains(&self.period_days) {
            return Err(ValidationError::InvalidPeriod);
        }
        if self.sweep_interval_secs < 10 {
            return Err(ValidationError::InvalidInterval("membership.sweep_interval_secs"));
        }
        Ok(())
    }
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            period_days: default_period_days(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_period_days() -> i64 {
    30
}

fn default_sweep_interval() -> u64 {
    3600
}
