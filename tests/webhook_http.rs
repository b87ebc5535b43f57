//! Integration tests for the HTTP surface.
//!
//! Sends requests through the full router (layers included):
//! 1. Payment webhook signature handling and status codes
//! 2. Bot webhook path token and asynchronous dispatch
//! 3. Health check and checkout landing page

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use vip_bot::adapters::http::{app_router, AppState};
use vip_bot::adapters::memory::InMemoryMembershipStore;
use vip_bot::application::handlers::bot::BotCommandHandler;
use vip_bot::application::handlers::membership::{
    HandlePaymentWebhookHandler, MembershipController, MembershipPolicy,
};
use vip_bot::application::handlers::pricing::PriceCache;
use vip_bot::domain::foundation::{DomainError, ErrorCode, ExternalUserId, Timestamp};
use vip_bot::domain::membership::{
    MembershipRecord, PaymentOutcome, PaymentReference, RevokeGuard, RevokeOutcome,
    WebhookVerifier, SIGNATURE_HEADER,
};
use vip_bot::domain::pricing::FreshnessPolicy;
use vip_bot::ports::{
    CheckoutRequest, CheckoutSession, MembershipStore, Messenger, OutgoingMessage,
    PaymentProvider,
};

const SECRET: &str = "sk_test_http";
const BOT_TOKEN: &str = "123456:TEST-TOKEN";

// =============================================================================
// Test Infrastructure
// =============================================================================

#[derive(Default)]
struct RecordingMessenger {
    sent: Mutex<Vec<OutgoingMessage>>,
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn answer_callback(&self, _callback_id: &str) -> Result<(), DomainError> {
        Ok(())
    }

    async fn remove_from_group(&self, _user_id: &ExternalUserId) -> Result<(), DomainError> {
        Ok(())
    }
}

struct StubPaymentProvider;

#[async_trait]
impl PaymentProvider for StubPaymentProvider {
    async fn create_checkout(&self, request: CheckoutRequest) -> Result<CheckoutSession, DomainError> {
        Ok(CheckoutSession {
            authorization_url: "https://checkout.example.com/abc".to_string(),
            reference: request.reference.as_str().to_string(),
        })
    }
}

/// Store whose every call fails, for the health check.
struct UnreachableStore;

#[async_trait]
impl MembershipStore for UnreachableStore {
    async fn find(&self, _user_id: &ExternalUserId) -> Result<Option<MembershipRecord>, DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn ensure_user(&self, _user_id: &ExternalUserId, _now: Timestamp) -> Result<(), DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn record_payment(
        &self,
        _user_id: &ExternalUserId,
        _reference: &PaymentReference,
        _now: Timestamp,
        _period: chrono::Duration,
    ) -> Result<PaymentOutcome, DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn revoke(
        &self,
        _user_id: &ExternalUserId,
        _guard: RevokeGuard,
        _now: Timestamp,
    ) -> Result<RevokeOutcome, DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn find_expired_active(&self, _now: Timestamp) -> Result<Vec<MembershipRecord>, DomainError> {
        Err(DomainError::database("connection refused"))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::DatabaseError, "connection refused"))
    }
}

struct TestApp {
    router: Router,
    store: Arc<dyn MembershipStore>,
    messenger: Arc<RecordingMessenger>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_store(Arc::new(InMemoryMembershipStore::new()))
    }

    fn with_store(store: Arc<dyn MembershipStore>) -> Self {
        let messenger = Arc::new(RecordingMessenger::default());
        let controller = Arc::new(MembershipController::new(
            store.clone(),
            MembershipPolicy::default(),
        ));
        let webhook_handler = Arc::new(HandlePaymentWebhookHandler::new(
            verifier(),
            controller.clone(),
            messenger.clone(),
        ));
        let bot_handler = Arc::new(BotCommandHandler::new(
            controller,
            messenger.clone(),
            Arc::new(StubPaymentProvider),
            Arc::new(PriceCache::new(FreshnessPolicy::default())),
        ));
        let state = AppState::new(
            store.clone(),
            webhook_handler,
            bot_handler,
            SecretString::new(BOT_TOKEN.to_string()),
        );

        Self {
            router: app_router(state, Duration::from_secs(10)),
            store,
            messenger,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    /// Waits for spawned bot work to produce a message.
    async fn wait_for_message_to(&self, chat_id: &str) -> Option<OutgoingMessage> {
        for _ in 0..100 {
            if let Some(message) = self
                .messenger
                .sent
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.chat_id == chat_id)
                .cloned()
            {
                return Some(message);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }
}

fn verifier() -> WebhookVerifier {
    WebhookVerifier::new(SecretString::new(SECRET.to_string()))
}

fn charge_body(reference: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": "charge.success",
        "data": {"reference": reference, "amount": 200_000, "currency": "NGN"}
    }))
    .unwrap()
}

fn webhook_request(body: Vec<u8>, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/paystack/webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body)).unwrap()
}

fn telegram_request(token: &str, update: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/telegram/{}", token))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&update).unwrap()))
        .unwrap()
}

fn user(id: &str) -> ExternalUserId {
    ExternalUserId::new(id).unwrap()
}

// =============================================================================
// Payment Webhook
// =============================================================================

#[tokio::test]
async fn valid_signature_activates_membership() {
    let app = TestApp::new();
    let body = charge_body("VIP_555_1000");
    let signature = verifier().sign(&body).unwrap();

    let (status, _) = app.send(webhook_request(body, Some(&signature))).await;

    assert_eq!(status, StatusCode::OK);
    let record = app.store.find(&user("555")).await.unwrap().unwrap();
    assert!(record.is_active());
}

#[tokio::test]
async fn bad_signature_is_unauthorized_and_mutates_nothing() {
    let app = TestApp::new();
    let body = charge_body("VIP_555_1000");
    let forged = verifier().sign(b"something else").unwrap();

    let (status, body) = app.send(webhook_request(body, Some(&forged))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("INVALID_WEBHOOK_SIGNATURE"));
    assert!(app.store.find(&user("555")).await.unwrap().is_none());
}

#[tokio::test]
async fn missing_signature_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app.send(webhook_request(charge_body("VIP_555_1000"), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn replay_is_acknowledged_without_second_notification() {
    let app = TestApp::new();
    let body = charge_body("VIP_555_1000");
    let signature = verifier().sign(&body).unwrap();

    let (first, _) = app.send(webhook_request(body.clone(), Some(&signature))).await;
    let expires_after_first = app.store.find(&user("555")).await.unwrap().unwrap().expires_at;
    let (second, _) = app.send(webhook_request(body, Some(&signature))).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    let record = app.store.find(&user("555")).await.unwrap().unwrap();
    assert_eq!(record.expires_at, expires_after_first);
    assert_eq!(app.messenger.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unrelated_event_is_acknowledged() {
    let app = TestApp::new();
    let body = serde_json::to_vec(&json!({"event": "transfer.success", "data": {}})).unwrap();
    let signature = verifier().sign(&body).unwrap();

    let (status, _) = app.send(webhook_request(body, Some(&signature))).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn store_failure_asks_provider_to_retry() {
    let app = TestApp::with_store(Arc::new(UnreachableStore));
    let body = charge_body("VIP_555_1000");
    let signature = verifier().sign(&body).unwrap();

    let (status, body) = app.send(webhook_request(body, Some(&signature))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("connection refused"));
}

// =============================================================================
// Bot Webhook
// =============================================================================

#[tokio::test]
async fn wrong_bot_token_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app
        .send(telegram_request("123456:WRONG", json!({"update_id": 1})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn start_command_registers_user_and_sends_menu() {
    let app = TestApp::new();
    let update = json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "chat": {"id": 555, "type": "private"},
            "from": {"id": 555, "is_bot": false, "first_name": "Ada"},
            "text": "/start"
        }
    });

    let (status, _) = app.send(telegram_request(BOT_TOKEN, update)).await;

    assert_eq!(status, StatusCode::OK);
    let menu = app.wait_for_message_to("555").await.expect("menu was not sent");
    assert_eq!(menu.buttons.len(), 2);
    assert_eq!(menu.buttons[0].callback_data, "btc");
    assert_eq!(menu.buttons[1].callback_data, "vip");
    assert!(app.store.find(&user("555")).await.unwrap().is_some());
}

#[tokio::test]
async fn vip_button_returns_checkout_link() {
    let app = TestApp::new();
    let update = json!({
        "update_id": 2,
        "callback_query": {
            "id": "cb-1",
            "from": {"id": 777, "is_bot": false, "first_name": "Lin"},
            "message": {"message_id": 5, "chat": {"id": 777, "type": "private"}},
            "data": "vip"
        }
    });

    let (status, _) = app.send(telegram_request(BOT_TOKEN, update)).await;

    assert_eq!(status, StatusCode::OK);
    let reply = app.wait_for_message_to("777").await.expect("no checkout reply");
    assert_eq!(reply.text, "Pay VIP here 🔥:\nhttps://checkout.example.com/abc");
}

#[tokio::test]
async fn undecodable_update_is_acknowledged() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri(format!("/telegram/{}", BOT_TOKEN))
        .body(Body::from("not json"))
        .unwrap();

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Health and Landing Page
// =============================================================================

#[tokio::test]
async fn health_reports_running() {
    let app = TestApp::new();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Bot Running 🚀");
}

#[tokio::test]
async fn health_reports_unavailable_store() {
    let app = TestApp::with_store(Arc::new(UnreachableStore));
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn payment_success_page_renders() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/payment-success?reference=VIP_555_1000")
        .body(Body::empty())
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment Successful 🎉"));
    assert!(body.contains("You can now return to Telegram."));
}
