//! Membership domain module.
//!
//! VIP lifecycle, payment references, and verification of payment
//! notifications.
//!
//! # Module Structure
//!
//! - `record` - MembershipRecord entity and its pure transitions
//! - `status` - MembershipStatus state machine
//! - `payment_reference` - Reference build/parse
//! - `outcome` - Payment, access and revoke results
//! - `payment_event` - Decoded provider notifications
//! - `webhook_verifier` - HMAC verification of raw webhook bodies

mod errors;
mod outcome;
mod payment_event;
mod payment_reference;
mod record;
mod status;
mod webhook_errors;
mod webhook_verifier;

pub use errors::MembershipError;
pub use outcome::{
    AccessDecision, DenyReason, PaymentOutcome, RejectReason, RevokeGuard, RevokeOutcome,
};
pub use payment_event::{ChargeSuccess, PaymentEvent, CHARGE_SUCCESS};
pub use payment_reference::{PaymentReference, DEFAULT_REFERENCE_PREFIX, REFERENCE_DELIMITER};
pub use record::MembershipRecord;
pub use status::MembershipStatus;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{WebhookVerifier, SIGNATURE_HEADER};
