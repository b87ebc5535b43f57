//! Application handlers.
//!
//! Command handlers and background services that orchestrate domain
//! operations through the ports.

pub mod bot;
pub mod membership;
pub mod pricing;

pub use bot::{BotCommandHandler, BotInput};
pub use membership::{
    ExpirySweep, ExpirySweepConfig, HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
    HandlePaymentWebhookResult, MembershipController, MembershipPolicy, SweepReport,
};
pub use pricing::{PriceCache, PriceRefresher, PriceView};
