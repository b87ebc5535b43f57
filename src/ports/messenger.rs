//! Messaging port.
//!
//! Outbound side of the chat platform: text messages with optional inline
//! buttons, callback acknowledgement and removal from the VIP group.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ExternalUserId};

/// Port for the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a message to a chat.
    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), DomainError>;

    /// Acknowledge a button press so the client stops its spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), DomainError>;

    /// Remove a user from the restricted VIP group.
    ///
    /// The user may join again later with a new invite.
    async fn remove_from_group(&self, user_id: &ExternalUserId) -> Result<(), DomainError>;
}

/// Message to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: String,
    pub text: String,

    /// One row of inline buttons. Empty for plain text.
    pub buttons: Vec<InlineButton>,
}

impl OutgoingMessage {
    /// Plain text message.
    pub fn text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    /// Adds an inline button.
    pub fn with_button(mut self, label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        self.buttons.push(InlineButton {
            label: label.into(),
            callback_data: callback_data.into(),
        });
        self
    }
}

/// Inline keyboard button that reports `callback_data` when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}
