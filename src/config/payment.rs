//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use super::telegram::is_http_url;

/// Path the payment provider sends the browser back to.
pub const PAYMENT_SUCCESS_PATH: &str = "/payment-success";

/// Payment configuration (Paystack)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Paystack secret key, also used to sign webhooks
    pub paystack_secret_key: SecretString,

    /// Paystack API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Public URL this service is reachable at
    pub public_base_url: String,

    /// Membership price in minor units (kobo)
    #[serde(default = "default_price_minor_units")]
    pub price_minor_units: i64,

    /// ISO 4217 code the price is charged in
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Prefix of generated payment references
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl PaymentConfig {
    /// Check if using Paystack test mode
    pub fn is_test_mode(&self) -> bool {
        self.paystack_secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Paystack live mode
    pub fn is_live_mode(&self) -> bool {
        self.paystack_secret_key.expose_secret().starts_with("sk_live_")
    }

    /// URL the checkout returns to after payment
    pub fn callback_url(&self) -> String {
        format!(
            "{}{}",
            self.public_base_url.trim_end_matches('/'),
            PAYMENT_SUCCESS_PATH
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let key = self.paystack_secret_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("payment.paystack_secret_key"));
        }
        if !key.starts_with("sk_") {
            return Err(ValidationError::InvalidPaystackKey);
        }
        if *environment == Environment::Production && !self.is_live_mode() {
            return Err(ValidationError::InvalidPaystackKey);
        }

        if self.public_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("payment.public_base_url"));
        }
        if !is_http_url(&self.public_base_url) {
            return Err(ValidationError::InvalidUrl("payment.public_base_url"));
        }
        if *environment == Environment::Production && !self.public_base_url.starts_with("https://")
        {
            return Err(ValidationError::PublicUrlMustBeHttps);
        }
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("payment.api_base_url"));
        }

        if self.price_minor_units <= 0 {
            return Err(ValidationError::InvalidPrice);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.reference_prefix.is_empty() || self.reference_prefix.contains('_') {
            return Err(ValidationError::MissingRequired("payment.reference_prefix"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout("payment.request_timeout_secs"));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.paystack.co".to_string()
}

fn default_price_minor_units() -> i64 {
    200_000
}

fn default_currency() -> String {
    "NGN".to_string()
}

fn default_reference_prefix() -> String {
    "VIP".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str, public_base_url: &str) -> PaymentConfig {
        PaymentConfig {
            paystack_secret_key: SecretString::new(key.to_string()),
            api_base_url: default_api_base_url(),
            public_base_url: public_base_url.to_string(),
            price_minor_units: default_price_minor_units(),
            currency: default_currency(),
            reference_prefix: default_reference_prefix(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    #[test]
    fn test_is_test_mode() {
        let config = config("sk_test_xxx", "https://bot.example.com");
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_callback_url() {
        let config = config("sk_test_xxx", "https://bot.example.com/");
        assert_eq!(config.callback_url(), "https://bot.example.com/payment-success");
    }

    #[test]
    fn test_validation_missing_key() {
        let config = config("", "https://bot.example.com");
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("payment.paystack_secret_key"))
        );
    }

    #[test]
    fn test_validation_wrong_key_prefix() {
        let config = config("pk_test_xxx", "https://bot.example.com");
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidPaystackKey)
        );
    }

    #[test]
    fn test_production_requires_live_key_and_https() {
        let test_key = config("sk_test_xxx", "https://bot.example.com");
        assert!(test_key.validate(&Environment::Production).is_err());

        let plain_http = config("sk_live_xxx", "http://bot.example.com");
        assert_eq!(
            plain_http.validate(&Environment::Production),
            Err(ValidationError::PublicUrlMustBeHttps)
        );

        let good = config("sk_live_xxx", "https://bot.example.com");
        assert!(good.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_validation_non_positive_price() {
        let mut config = config("sk_test_xxx", "http://localhost:3000");
        config.price_minor_units = 0;
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidPrice)
        );
    }

    #[test]
    fn test_validation_currency_code() {
        let mut config = config("sk_test_xxx", "http://localhost:3000");
        config.currency = "naira".to_string();
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidCurrency)
        );
    }

    #[test]
    fn test_validation_prefix_with_delimiter() {
        let mut config = config("sk_test_xxx", "http://localhost:3000");
        config.reference_prefix = "VIP_X".to_string();
        assert!(config.validate(&Environment::Development).is_err());
    }
}
