//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `MembershipStore` - Durable membership records with atomic transitions
//! - `Messenger` - Chat platform (messages, callbacks, group removal)
//! - `PaymentProvider` - Hosted checkout creation
//! - `PriceSource` - Public price feed

mod membership_store;
mod messenger;
mod payment_provider;
mod price_source;

pub use membership_store::MembershipStore;
pub use messenger::{InlineButton, Messenger, OutgoingMessage};
pub use payment_provider::{CheckoutRequest, CheckoutSession, PaymentProvider};
pub use price_source::PriceSource;
