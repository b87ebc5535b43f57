//! Paystack payment provider adapter.
//!
//! Creates hosted checkout sessions with `POST /transaction/initialize`.
//! The HTTP client carries a hard timeout so a slow provider cannot hold a
//! bot handler indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{CheckoutRequest, CheckoutSession, PaymentProvider};

use super::wire_types::{InitializeTransactionData, InitializeTransactionRequest, PaystackResponse};

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    secret_key: SecretString,
    pub api_base_url: String,
    /// Where the browser lands after paying.
    pub callback_url: String,
    pub timeout: Duration,
}

impl PaystackConfig {
    pub fn new(secret_key: SecretString, callback_url: impl Into<String>) -> Self {
        Self {
            secret_key,
            api_base_url: "https://api.paystack.co".to_string(),
            callback_url: callback_url.into(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Paystack payment provider adapter.
pub struct PaystackPaymentAdapter {
    config: PaystackConfig,
    http_client: Client,
}

impl PaystackPaymentAdapter {
    /// Create a new adapter with the given configuration.
    pub fn new(config: PaystackConfig) -> Result<Self, DomainError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::new(ErrorCode::InternalError, format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn initialize_url(&self) -> String {
        format!(
            "{}/transaction/initialize",
            self.config.api_base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PaymentProvider for PaystackPaymentAdapter {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutSession, DomainError> {
        let body = InitializeTransactionRequest {
            email: request.email,
            amount: request.amount_minor,
            callback_url: self.config.callback_url.clone(),
            reference: request.reference.as_str().to_string(),
        };

        let response = self
            .http_client
            .post(self.initialize_url())
            .bearer_auth(self.config.secret_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::warn!(reference = %body.reference, "Paystack initialize timed out");
                }
                DomainError::upstream(format!("Paystack request failed: {}", e))
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(DomainError::upstream(format!("Paystack returned {}", status)));
        }

        let parsed: PaystackResponse<InitializeTransactionData> = response.json().await.map_err(|e| {
            DomainError::upstream(format!("Failed to parse Paystack response: {}", e))
        })?;

        match parsed.data {
            Some(data) if status.is_success() && parsed.status => Ok(CheckoutSession {
                authorization_url: data.authorization_url,
                reference: data.reference,
            }),
            _ => {
                tracing::warn!(
                    status = %status,
                    message = %parsed.message,
                    reference = %body.reference,
                    "Paystack rejected initialize"
                );
                Err(DomainError::new(
                    ErrorCode::UpstreamRejected,
                    format!("Paystack rejected checkout: {}", parsed.message),
                )
                .with_detail("status", status.as_str()))
            }
        }
    }
}
