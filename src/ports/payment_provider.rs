//! Payment provider port.
//!
//! Creates hosted checkout sessions. Confirmation arrives later through the
//! signed webhook, never through this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::membership::PaymentReference;

/// Port for the payment gateway.
///
/// Implementations must bound the outbound call with a timeout and report
/// timeouts and transport failures as `UpstreamUnavailable`.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a checkout session and return the URL the user pays at.
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutSession, DomainError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub reference: PaymentReference,

    /// Customer email; synthesised when the platform gives none.
    pub email: String,

    /// Amount in minor units.
    pub amount_minor: i64,
}

/// Hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub authorization_url: String,
    pub reference: String,
}
