//! Payment webhook signature verification.
//!
//! The provider signs each notification with HMAC-SHA512 over the exact body
//! bytes, keyed with the account secret, and sends the hex digest in the
//! `x-paystack-signature` header. Verification always runs on the bytes as
//! received, never on a re-serialized copy.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::payment_event::PaymentEvent;
use super::webhook_errors::WebhookError;

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-paystack-signature";

type HmacSha512 = Hmac<Sha512>;

/// Verifier for payment provider webhook signatures.
pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    /// Creates a new verifier with the provider secret key.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Checks the claimed signature against the payload.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - no header value
    /// - `InvalidSignature` - not hex, or digest mismatch
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let claimed = hex::decode(signature).map_err(|_| WebhookError::InvalidSignature)?;
        let expected = self.compute_signature(payload)?;

        if !constant_time_compare(&expected, &claimed) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Verifies the signature, then decodes the event.
    ///
    /// Decoding only happens once the bytes are authenticated.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<PaymentEvent, WebhookError> {
        self.verify(payload, signature)?;
        PaymentEvent::from_slice(payload)
    }

    /// Hex signature the provider would send for `payload`.
    pub fn sign(&self, payload: &[u8]) -> Result<String, WebhookError> {
        self.compute_signature(payload).map(hex::encode)
    }

    fn compute_signature(&self, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha512::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
