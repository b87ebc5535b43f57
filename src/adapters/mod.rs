//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Membership store on PostgreSQL
//! - `memory` - Membership store in process memory
//! - `paystack` - Hosted checkout
//! - `telegram` - Chat messaging and inbound update decoding
//! - `coingecko` - Public price feed
//! - `http` - Webhook endpoints and health check

pub mod coingecko;
pub mod http;
pub mod memory;
pub mod paystack;
pub mod postgres;
pub mod telegram;
