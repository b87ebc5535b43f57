//! Telegram Bot API adapter.
//!
//! - `TelegramMessenger` implements the `Messenger` port over HTTPS.
//! - `Update` and friends decode webhook deliveries into `BotInput`.

mod telegram_messenger;
mod updates;

pub use telegram_messenger::{TelegramConfig, TelegramMessenger};
pub use updates::{CallbackQuery, Chat, Message, Update, User};
