//! Payment provider event types.
//!
//! Provider payloads are decoded into a closed set of variants before they
//! reach the controller. Only fields relevant to membership are captured.

use serde::Deserialize;

use super::webhook_errors::WebhookError;

/// Provider event name for a completed charge.
pub const CHARGE_SUCCESS: &str = "charge.success";

/// Decoded payment notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A charge completed.
    ChargeSuccess(ChargeSuccess),

    /// Any other event type. Acknowledged and ignored.
    Other { event_type: String },
}

/// Fields of a `charge.success` event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChargeSuccess {
    /// Reference supplied when the checkout was created.
    pub reference: String,

    /// Amount paid in minor units (kobo).
    pub amount: i64,

    /// ISO 4217 code, checked against the configured price currency.
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl PaymentEvent {
    /// Decodes the raw webhook body.
    ///
    /// # Errors
    ///
    /// `ParseError` if the body is not an event envelope, or if a
    /// `charge.success` event lacks its reference or amount.
    pub fn from_slice(payload: &[u8]) -> Result<Self, WebhookError> {
        let raw: RawEvent =
            serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))?;

        match raw.event.as_str() {
            CHARGE_SUCCESS => {
                let charge: ChargeSuccess = serde_json::from_value(raw.data)
                    .map_err(|e| WebhookError::ParseError(e.to_string()))?;
                Ok(PaymentEvent::ChargeSuccess(charge))
            }
            _ => Ok(PaymentEvent::Other {
                event_type: raw.event,
            }),
        }
    }

    /// Provider event name.
    pub fn event_type(&self) -> &str {
        match self {
            PaymentEvent::ChargeSuccess(_) => CHARGE_SUCCESS,
            PaymentEvent::Other { event_type } => event_type,
        }
    }
}
