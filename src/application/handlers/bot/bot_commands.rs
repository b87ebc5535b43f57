//! BotCommandHandler - Chat commands and inline button presses.
//!
//! `/start` registers the user and shows the menu. The `btc` button serves the
//! cached price to VIPs. The `vip` button either confirms an active membership
//! or opens a checkout.

use std::sync::Arc;

use crate::application::handlers::membership::MembershipController;
use crate::application::handlers::pricing::{PriceCache, PriceView};
use crate::domain::foundation::{ExternalUserId, Timestamp};
use crate::domain::membership::{AccessDecision, MembershipError};
use crate::ports::{CheckoutRequest, Messenger, OutgoingMessage, PaymentProvider};

pub const CALLBACK_BTC: &str = "btc";
pub const CALLBACK_VIP: &str = "vip";

const WELCOME: &str = "Welcome 🚀 Choose an option:";
const VIP_REQUIRED: &str = "VIP required or expired 🚫";
const PRICE_UNAVAILABLE: &str = "Price not available yet. Try again in a few seconds.";
const TRY_AGAIN_LATER: &str = "Something went wrong. Please try again later.";

/// Inbound chat interaction, already stripped of platform wire details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotInput {
    /// Text message starting with `/`.
    Command {
        chat_id: String,
        user_id: ExternalUserId,
        command: String,
    },

    /// Inline button press.
    Callback {
        callback_id: String,
        chat_id: String,
        user_id: ExternalUserId,
        data: String,
    },
}

impl BotInput {
    pub fn chat_id(&self) -> &str {
        match self {
            BotInput::Command { chat_id, .. } | BotInput::Callback { chat_id, .. } => chat_id,
        }
    }
}

/// Handler for bot interactions.
pub struct BotCommandHandler {
    controller: Arc<MembershipController>,
    messenger: Arc<dyn Messenger>,
    payments: Arc<dyn PaymentProvider>,
    prices: Arc<PriceCache>,
}

impl BotCommandHandler {
    pub fn new(
        controller: Arc<MembershipController>,
        messenger: Arc<dyn Messenger>,
        payments: Arc<dyn PaymentProvider>,
        prices: Arc<PriceCache>,
    ) -> Self {
        Self {
            controller,
            messenger,
            payments,
            prices,
        }
    }

    /// Handle one interaction. Failures end in a generic reply, never a panic.
    pub async fn handle(&self, input: BotInput) {
        let chat_id = input.chat_id().to_string();

        if let Err(e) = self.dispatch(input).await {
            tracing::error!(chat_id = %chat_id, error = %e, "Bot interaction failed");
            self.reply(OutgoingMessage::text(chat_id, TRY_AGAIN_LATER)).await;
        }
    }

    async fn dispatch(&self, input: BotInput) -> Result<(), MembershipError> {
        match input {
            BotInput::Command {
                chat_id,
                user_id,
                command,
            } => match command.as_str() {
                "/start" => self.start(chat_id, &user_id).await,
                other => {
                    tracing::debug!(command = other, "Unknown command");
                    Ok(())
                }
            },
            BotInput::Callback {
                callback_id,
                chat_id,
                user_id,
                data,
            } => {
                // Acknowledge first so the client never waits on the core
                if let Err(e) = self.messenger.answer_callback(&callback_id).await {
                    tracing::warn!(callback_id = %callback_id, error = %e, "Failed to answer callback");
                }

                match data.as_str() {
                    CALLBACK_BTC => self.btc_price(chat_id, &user_id).await,
                    CALLBACK_VIP => self.vip(chat_id, &user_id).await,
                    other => {
                        tracing::debug!(data = other, "Unknown callback");
                        Ok(())
                    }
                }
            }
        }
    }

    async fn start(&self, chat_id: String, user_id: &ExternalUserId) -> Result<(), MembershipError> {
        self.controller.register_user(user_id, Timestamp::now()).await?;

        let menu = OutgoingMessage::text(chat_id, WELCOME)
            .with_button("BTC Price 💰", CALLBACK_BTC)
            .with_button("VIP Subscription 🔥", CALLBACK_VIP);
        self.reply(menu).await;
        Ok(())
    }

    async fn btc_price(&self, chat_id: String, user_id: &ExternalUserId) -> Result<(), MembershipError> {
        let now = Timestamp::now();

        let allowed = match self.controller.check_access(user_id, now).await {
            Ok(decision) => decision.is_allowed(),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Access check failed, denying");
                false
            }
        };
        if !allowed {
            self.reply(OutgoingMessage::text(chat_id, VIP_REQUIRED)).await;
            return Ok(());
        }

        let text = match self.prices.read(now).await {
            PriceView::Fresh(quote) => format!(
                "BTC Price: {}\nLast Updated: {}",
                quote.display_usd(),
                quote.fetched_at.to_time_string()
            ),
            PriceView::Stale { quote, age } => format!(
                "BTC Price: {}\nLast Updated: {}\n⚠️ Price is {} min old",
                quote.display_usd(),
                quote.fetched_at.to_time_string(),
                age.num_minutes()
            ),
            PriceView::Unavailable => PRICE_UNAVAILABLE.to_string(),
        };

        self.reply(OutgoingMessage::text(chat_id, text)).await;
        Ok(())
    }

    async fn vip(&self, chat_id: String, user_id: &ExternalUserId) -> Result<(), MembershipError> {
        let now = Timestamp::now();

        if let AccessDecision::Allowed { expires_at } =
            self.controller.check_access(user_id, now).await?
        {
            let text = format!(
                "You are already VIP ✅\nExpires on: {}",
                expires_at.to_date_string()
            );
            self.reply(OutgoingMessage::text(chat_id, text)).await;
            return Ok(());
        }

        let reference = self.controller.checkout_reference(user_id, now)?;
        let request = CheckoutRequest {
            reference,
            email: format!("{}@vipuser.com", user_id),
            amount_minor: self.controller.policy().price_minor_units,
        };

        let session = self
            .payments
            .create_checkout(request)
            .await
            .map_err(|e| MembershipError::payment_provider(e.to_string()))?;

        tracing::info!(user_id = %user_id, reference = %session.reference, "Checkout created");
        self.reply(OutgoingMessage::text(
            chat_id,
            format!("Pay VIP here 🔥:\n{}", session.authorization_url),
        ))
        .await;
        Ok(())
    }

    async fn reply(&self, message: OutgoingMessage) {
        if let Err(e) = self.messenger.send_message(&message).await {
            tracing::warn!(chat_id = %message.chat_id, error = %e, "Failed to send message");
        }
    }
}
