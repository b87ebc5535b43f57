//! Telegram configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather (`123456:ABC...`)
    pub bot_token: SecretString,

    /// Bot API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Chat id or `@username` of the VIP group members are removed from
    pub vip_group: Option<String>,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl TelegramConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let token = self.bot_token.expose_secret();
        if token.is_empty() {
            return Err(ValidationError::MissingRequired("telegram.bot_token"));
        }
        if !token.contains(':') {
            return Err(ValidationError::InvalidBotToken);
        }
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("telegram.api_base_url"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("telegram.request_timeout_secs"));
        }
        if matches!(&self.vip_group, Some(group) if group.trim().is_empty()) {
            return Err(ValidationError::MissingRequired("telegram.vip_group"));
        }
        Ok(())
    }
}

pub(super) fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: SecretString::new(token.to_string()),
            api_base_url: default_api_base_url(),
            vip_group: Some("-1001234567890".to_string()),
            request_timeout_secs: default_request_timeout(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config("123456:ABC-DEF").validate().is_ok());
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(
            config("").validate(),
            Err(ValidationError::MissingRequired("telegram.bot_token"))
        );
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(
            config("not-a-token").validate(),
            Err(ValidationError::InvalidBotToken)
        );
    }

    #[test]
    fn test_blank_vip_group() {
        let mut config = config("123456:ABC");
        config.vip_group = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", config("123456:SUPERSECRET"));
        assert!(!rendered.contains("SUPERSECRET"));
    }
}
