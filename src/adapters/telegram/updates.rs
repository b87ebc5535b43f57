//! Inbound Telegram update payloads.
//!
//! Only the fields the bot reads are modelled; everything else in the update
//! is ignored by serde.

use serde::Deserialize;

use crate::application::handlers::bot::BotInput;
use crate::domain::foundation::ExternalUserId;

/// One webhook delivery from Telegram.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

impl Update {
    /// Convert to a platform-neutral interaction.
    ///
    /// Returns `None` for updates the bot does not react to (plain text,
    /// edits, channel posts, callbacks without data).
    pub fn into_bot_input(self) -> Option<BotInput> {
        if let Some(query) = self.callback_query {
            let data = query.data?;
            // Callbacks on very old messages arrive without the message
            let chat_id = query
                .message
                .map(|m| m.chat.id)
                .unwrap_or(query.from.id);
            return Some(BotInput::Callback {
                callback_id: query.id,
                chat_id: chat_id.to_string(),
                user_id: ExternalUserId::from(query.from.id),
                data,
            });
        }

        let message = self.message?;
        let from = message.from?;
        let text = message.text?;
        let command = command_name(&text)?;

        Some(BotInput::Command {
            chat_id: message.chat.id.to_string(),
            user_id: ExternalUserId::from(from.id),
            command,
        })
    }
}

/// `/start@my_bot payload` → `/start`.
fn command_name(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    let name = first.split('@').next().unwrap_or(first);
    Some(name.to_string())
}
