//! HTTP response bodies.

use serde::Serialize;

/// Error body returned on non-2xx responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Page shown after the hosted checkout redirects back.
pub const PAYMENT_SUCCESS_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Payment Successful</title></head>
  <body style="font-family: sans-serif; text-align: center; margin-top: 4em;">
    <h1>Payment Successful 🎉</h1>
    <p>You can now return to Telegram.</p>
  </body>
</html>
"#;

pub const HEALTHY: &str = "Bot Running 🚀";
