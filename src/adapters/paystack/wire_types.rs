//! Paystack API request and response bodies.

use serde::{Deserialize, Serialize};

/// Body of `POST /transaction/initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitializeTransactionRequest {
    pub email: String,
    /// Amount in kobo.
    pub amount: i64,
    pub callback_url: String,
    pub reference: String,
}

/// Envelope every Paystack response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct PaystackResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// `data` of a successful initialize call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitializeTransactionData {
    pub authorization_url: String,
    #[serde(default)]
    pub access_code: Option<String>,
    pub reference: String,
}
