//! Paystack payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Paystack transaction API.
//! Webhook verification lives in the domain (`WebhookVerifier`) because it
//! only needs the secret and the raw bytes.
//!
//! # Configuration
//!
//! - secret key (also the webhook signing key)
//! - API base URL (default `https://api.paystack.co`)
//! - callback URL the browser returns to after paying
//! - request timeout

mod paystack_adapter;
mod wire_types;

pub use paystack_adapter::{PaystackConfig, PaystackPaymentAdapter};
pub use wire_types::{InitializeTransactionData, InitializeTransactionRequest, PaystackResponse};
