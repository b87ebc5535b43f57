//! Shared state for the HTTP surface.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::application::handlers::bot::BotCommandHandler;
use crate::application::handlers::membership::HandlePaymentWebhookHandler;
use crate::ports::MembershipStore;

/// Dependencies the handlers need.
///
/// Cloned per request; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MembershipStore>,
    pub webhook_handler: Arc<HandlePaymentWebhookHandler>,
    pub bot_handler: Arc<BotCommandHandler>,
    telegram_path_token: Arc<SecretString>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        webhook_handler: Arc<HandlePaymentWebhookHandler>,
        bot_handler: Arc<BotCommandHandler>,
        telegram_path_token: SecretString,
    ) -> Self {
        Self {
            store,
            webhook_handler,
            bot_handler,
            telegram_path_token: Arc::new(telegram_path_token),
        }
    }

    /// Constant-time comparison of the secret path segment of the bot webhook.
    pub fn is_telegram_token(&self, candidate: &str) -> bool {
        let expected = self.telegram_path_token.expose_secret().as_bytes();
        !expected.is_empty() && bool::from(expected.ct_eq(candidate.as_bytes()))
    }
}
