//! CoinGecko implementation of the PriceSource port.
//!
//! Uses the keyless `simple/price` endpoint, which answers with
//! `{"bitcoin": {"usd": 67123.45}}`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::pricing::PriceQuote;
use crate::ports::PriceSource;

/// CoinGecko API configuration.
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    /// Full `simple/price` URL including the query string.
    pub api_url: String,
    /// Asset key in the response body.
    pub asset: String,
    pub timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"
                .to_string(),
            asset: "bitcoin".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl CoinGeckoConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// Price source backed by CoinGecko.
pub struct CoinGeckoPriceSource {
    config: CoinGeckoConfig,
    http_client: Client,
}

impl CoinGeckoPriceSource {
    pub fn new(config: CoinGeckoConfig) -> Result<Self, DomainError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

/// Pull `asset.usd` out of a `simple/price` body.
fn extract_quote(
    body: &SimplePriceResponse,
    asset: &str,
    now: Timestamp,
) -> Result<PriceQuote, DomainError> {
    let usd = body
        .get(asset)
        .and_then(|prices| prices.get("usd"))
        .copied()
        .ok_or_else(|| DomainError::upstream(format!("CoinGecko response has no {}.usd", asset)))?;

    PriceQuote::from_usd(asset, usd, now)
        .map_err(|e| DomainError::upstream(format!("Unusable CoinGecko price: {}", e)))
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
    async fn fetch_quote(&self) -> Result<PriceQuote, DomainError> {
        let response = self
            .http_client
            .get(&self.config.api_url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("CoinGecko request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::upstream(format!("CoinGecko returned {}", status)));
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| DomainError::upstream(format!("Failed to parse CoinGecko response: {}", e)))?;

        extract_quote(&body, &self.config.asset, Timestamp::now())
    }
}
