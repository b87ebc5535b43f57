//! Bot handlers.
//!
//! Interactions arriving from the chat platform.

mod bot_commands;

pub use bot_commands::{BotCommandHandler, BotInput, CALLBACK_BTC, CALLBACK_VIP};
