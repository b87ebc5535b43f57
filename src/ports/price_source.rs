//! Price source port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::pricing::PriceQuote;

/// Port for a public price feed.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current quote.
    ///
    /// # Errors
    ///
    /// `UpstreamUnavailable` on transport failure or an unusable response.
    async fn fetch_quote(&self) -> Result<PriceQuote, DomainError>;
}
