//! Payment reference value object.
//!
//! A reference identifies one checkout attempt and carries the user it was
//! created for: `<PREFIX>_<user id>_<disambiguator>`, e.g. `VIP_555_1700000000000`.
//!
//! Parsing takes the second `_`-delimited field as the user id, so ids that
//! themselves contain `_` cannot round-trip. Building a reference for such an
//! id is refused rather than producing a reference that would parse to a
//! different user.

use std::fmt;

use crate::domain::foundation::{ExternalUserId, Timestamp, ValidationError};

/// Prefix of every reference this service issues.
pub const DEFAULT_REFERENCE_PREFIX: &str = "VIP";

/// Field delimiter inside a reference.
pub const REFERENCE_DELIMITER: char = '_';

/// Provider-visible idempotency key for one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentReference {
    raw: String,
    user_id: ExternalUserId,
}

impl PaymentReference {
    /// Builds a reference for `user_id` with an explicit disambiguator.
    pub fn build(
        prefix: &str,
        user_id: &ExternalUserId,
        disambiguator: impl fmt::Display,
    ) -> Result<Self, ValidationError> {
        if prefix.is_empty() {
            return Err(ValidationError::empty_field("reference_prefix"));
        }
        if prefix.contains(REFERENCE_DELIMITER) || user_id.as_str().contains(REFERENCE_DELIMITER) {
            return Err(ValidationError::invalid_format(
                "reference",
                format!("prefix and user id must not contain '{}'", REFERENCE_DELIMITER),
            ));
        }

        let disambiguator = disambiguator.to_string();
        if disambiguator.is_empty() {
            return Err(ValidationError::empty_field("reference_disambiguator"));
        }

        Ok(Self {
            raw: format!(
                "{prefix}{d}{user}{d}{disambiguator}",
                d = REFERENCE_DELIMITER,
                user = user_id.as_str()
            ),
            user_id: user_id.clone(),
        })
    }

    /// Builds a checkout reference disambiguated by the creation instant.
    pub fn for_checkout(
        prefix: &str,
        user_id: &ExternalUserId,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Self::build(prefix, user_id, now.as_unix_millis())
    }

    /// Parses a reference received from the payment provider.
    ///
    /// Requires the expected prefix, a non-empty user id field and a non-empty
    /// remainder.
    pub fn parse(prefix: &str, raw: &str) -> Result<Self, ValidationError> {
        let mut fields = raw.splitn(3, REFERENCE_DELIMITER);

        match fields.next() {
            Some(p) if p == prefix => {}
            _ => {
                return Err(ValidationError::invalid_format(
                    "reference",
                    format!("expected prefix '{}'", prefix),
                ))
            }
        }

        let user = fields.next().unwrap_or_default();
        let user_id = ExternalUserId::new(user)
            .map_err(|_| ValidationError::invalid_format("reference", "missing user id"))?;

        match fields.next() {
            Some(rest) if !rest.is_empty() => {}
            _ => {
                return Err(ValidationError::invalid_format(
                    "reference",
                    "missing disambiguator",
                ))
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            user_id,
        })
    }

    /// The exact string sent to and received from the provider.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The user embedded in the reference.
    pub fn user_id(&self) -> &ExternalUserId {
        &self.user_id
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
