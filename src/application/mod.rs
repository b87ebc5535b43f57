//! Application layer - Commands, Handlers, and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    BotCommandHandler, BotInput, ExpirySweep, ExpirySweepConfig, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, HandlePaymentWebhookResult, MembershipController,
    MembershipPolicy, PriceCache, PriceRefresher, PriceView, SweepReport,
};
