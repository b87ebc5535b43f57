//! Membership handlers.
//!
//! ## Commands
//! - Processing payment webhooks
//! - Sweeping expired memberships
//!
//! ## Lifecycle
//! - `MembershipController` records payments, checks access and revokes

mod controller;
mod expiry_sweep;
mod handle_payment_webhook;

pub use controller::{MembershipController, MembershipPolicy};
pub use expiry_sweep::{ExpirySweep, ExpirySweepConfig, SweepReport, EXPIRED_NOTICE};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};
