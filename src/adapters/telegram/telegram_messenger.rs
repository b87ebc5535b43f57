//! Telegram implementation of the Messenger port.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::foundation::{DomainError, ErrorCode, ExternalUserId};
use crate::ports::{Messenger, OutgoingMessage};

/// Telegram Bot API configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    bot_token: SecretString,
    pub api_base_url: String,
    /// Chat the VIP membership grants access to. `None` disables removals.
    pub vip_group: Option<String>,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            bot_token,
            api_base_url: "https://api.telegram.org".to_string(),
            vip_group: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_vip_group(mut self, group: impl Into<String>) -> Self {
        self.vip_group = Some(group.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Bot API envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton<'a> {
    text: &'a str,
    callback_data: &'a str,
}

/// Messenger backed by the Telegram Bot API.
pub struct TelegramMessenger {
    config: TelegramConfig,
    http_client: Client,
}

impl TelegramMessenger {
    pub fn new(config: TelegramConfig) -> Result<Self, DomainError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.bot_token.expose_secret(),
            method
        )
    }

    async fn call(&self, method: &str, body: Value) -> Result<(), DomainError> {
        let response = self
            .http_client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DomainError::upstream(format!("Telegram {} failed: {}", method, transport_kind(&e)))
            })?;

        let status = response.status();
        let parsed: ApiResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!(
                "Failed to parse Telegram {} response: {}",
                method,
                transport_kind(&e)
            ))
        })?;

        if parsed.ok {
            return Ok(());
        }

        let description = parsed.description.unwrap_or_default();
        let code = if status.is_server_error() || status.as_u16() == 429 {
            ErrorCode::UpstreamUnavailable
        } else {
            ErrorCode::UpstreamRejected
        };
        Err(DomainError::new(code, format!("Telegram {} rejected: {}", method, description))
            .with_detail("status", status.as_str()))
    }
}

/// reqwest errors embed the request URL, which carries the bot token.
fn transport_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timed out"
    } else if e.is_connect() {
        "connection error"
    } else if e.is_decode() {
        "invalid body"
    } else if e.is_status() {
        "bad status"
    } else {
        "request error"
    }
}

/// Numeric ids go out as numbers, `@channel` names as strings.
fn chat_id_value(chat_id: &str) -> Value {
    match chat_id.parse::<i64>() {
        Ok(id) => json!(id),
        Err(_) => json!(chat_id),
    }
}

fn send_message_body(message: &OutgoingMessage) -> Value {
    let mut body = json!({
        "chat_id": chat_id_value(&message.chat_id),
        "text": message.text,
    });

    if !message.buttons.is_empty() {
        let rows: Vec<Vec<InlineKeyboardButton<'_>>> = message
            .buttons
            .iter()
            .map(|b| {
                vec![InlineKeyboardButton {
                    text: &b.label,
                    callback_data: &b.callback_data,
                }]
            })
            .collect();
        body["reply_markup"] = json!({ "inline_keyboard": rows });
    }

    body
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), DomainError> {
        self.call("sendMessage", send_message_body(message)).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), DomainError> {
        self.call("answerCallbackQuery", json!({ "callback_query_id": callback_id }))
            .await
    }

    async fn remove_from_group(&self, user_id: &ExternalUserId) -> Result<(), DomainError> {
        let group = match &self.config.vip_group {
            Some(group) => group,
            None => {
                tracing::debug!(user_id = %user_id, "No VIP group configured, skipping removal");
                return Ok(());
            }
        };

        let telegram_user: i64 = user_id.as_str().parse().map_err(|_| {
            DomainError::validation("user_id", "Telegram user ids are numeric")
        })?;

        // Ban then unban: removes the member without a permanent ban
        self.call(
            "banChatMember",
            json!({ "chat_id": chat_id_value(group), "user_id": telegram_user }),
        )
        .await?;
        self.call(
            "unbanChatMember",
            json!({
                "chat_id": chat_id_value(group),
                "user_id": telegram_user,
                "only_if_banned": true,
            }),
        )
        .await
    }
}
