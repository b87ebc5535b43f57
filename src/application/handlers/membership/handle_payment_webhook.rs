//! HandlePaymentWebhookHandler - Command handler for payment provider webhooks.
//!
//! Authenticates the raw body, decodes the event, applies qualifying charges
//! through the controller and only then tells the user.

use std::sync::Arc;

use crate::domain::foundation::{ExternalUserId, Timestamp};
use crate::domain::membership::{
    MembershipError, PaymentEvent, PaymentOutcome, WebhookError, WebhookVerifier,
};
use crate::ports::{Messenger, OutgoingMessage};

use super::MembershipController;

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header value, if present.
    pub signature: Option<String>,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// A charge reached the controller.
    Processed {
        user_id: ExternalUserId,
        outcome: PaymentOutcome,
    },
    /// Event acknowledged, no action taken.
    Ignored { event_type: String },
}

/// Handler for payment provider webhooks.
pub struct HandlePaymentWebhookHandler {
    verifier: WebhookVerifier,
    controller: Arc<MembershipController>,
    messenger: Arc<dyn Messenger>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: WebhookVerifier,
        controller: Arc<MembershipController>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            verifier,
            controller,
            messenger,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify signature over the raw bytes, then decode
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, cmd.signature.as_deref())?;

        // 2. Only completed charges matter
        let charge = match event {
            PaymentEvent::ChargeSuccess(charge) => charge,
            PaymentEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Ignoring payment event");
                return Ok(HandlePaymentWebhookResult::Ignored { event_type });
            }
        };

        // 3. Extract the user from the reference
        let reference = self
            .controller
            .parse_reference(&charge.reference)
            .map_err(|_| WebhookError::MalformedReference(charge.reference.clone()))?;
        let user_id = reference.user_id().clone();

        // 4. Persist
        let outcome = self
            .controller
            .record_payment(
                &reference,
                &user_id,
                charge.amount,
                charge.currency.as_deref(),
                Timestamp::now(),
            )
            .await
            .map_err(|e| match e {
                MembershipError::Infrastructure(msg) => WebhookError::Database(msg),
                other => WebhookError::ParseError(other.to_string()),
            })?;

        // 5. Notify after the write committed
        if let Some(text) = notification_for(&outcome) {
            let message = OutgoingMessage::text(user_id.as_str(), text);
            if let Err(e) = self.messenger.send_message(&message).await {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to notify user of payment");
            }
        }

        Ok(HandlePaymentWebhookResult::Processed { user_id, outcome })
    }
}

fn notification_for(outcome: &PaymentOutcome) -> Option<String> {
    match outcome {
        PaymentOutcome::Activated { expires_at } => Some(format!(
            "VIP Activated ✅\nExpires: {}",
            expires_at.to_date_string()
        )),
        PaymentOutcome::Extended { expires_at, .. } => Some(format!(
            "VIP Extended ✅\nExpires: {}",
            expires_at.to_date_string()
        )),
        PaymentOutcome::Duplicate | PaymentOutcome::Rejected { .. } => None,
    }
}
