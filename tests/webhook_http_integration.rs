//! HTTP integration tests for the webhook endpoint.
//!
//! Requests go through the full axum router with `tower::ServiceExt::oneshot`,
//! so routing, body buffering, signature checks and response encoding are all
//! exercised together.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;

use eventsub::adapters::http::webhook_routes;
use eventsub::adapters::webhook::signature;
use eventsub::adapters::{DispatchTable, InMemoryMessageTracker, NotificationHandler};
use eventsub::domain::events::StreamOnline;
use eventsub::domain::Notification;

// =============================================================================
// Test Infrastructure
// =============================================================================

const WEBHOOK_PATH: &str = "/webhooks/eventsub";

const SECRET: &str = "hey this is really secret";
const CHALLENGE_ID: &str = "e7f8151c-5849-48d5-8db9-234618442877";
const CHALLENGE_TIMESTAMP: &str = "2023-03-09T04:44:48.062323705Z";
const CHALLENGE_BODY: &str = r#"{"subscription":{"id":"ef7e8fba-6c32-4ead-965d-61f21660d095","status":"webhook_callback_verification_pending","type":"channel.update","version":"1","condition":{"broadcaster_user_id":"132532813"},"transport":{"method":"webhook","callback":"https://testing.proxy.b.dnsge.org/webhooks"},"created_at":"2023-03-09T04:44:48.057734342Z","cost":0},"challenge":"olYc8-klwIH9BthhWWhTU-AhJQ0eatixVF2y6x3G5kk"}"#;
const CHALLENGE_SIGNATURE: &str =
    "sha256=9afe337a0526eda98c12cd5c6892f5eec5c86a2f0fde7e0655764382d464bce8";

const NOTIFICATION_TIMESTAMP: &str = "2023-03-09T05:00:00.000000000Z";
const STREAM_ONLINE_BODY: &str = r#"{
    "subscription": {
        "id": "f1c2a387-161a-49f9-a165-0f21d7a4e1c4",
        "status": "enabled",
        "type": "stream.online",
        "version": "1",
        "condition": {"broadcaster_user_id": "1337"},
        "transport": {"method": "webhook", "callback": "https://example.com/webhooks/eventsub"},
        "created_at": "2023-03-09T04:44:48.057734342Z",
        "cost": 0
    },
    "event": {
        "id": "9001",
        "broadcaster_user_id": "1337",
        "broadcaster_user_login": "cool_user",
        "broadcaster_user_name": "Cool_User",
        "type": "live",
        "started_at": "2023-03-09T04:59:59.000000000Z"
    }
}"#;

struct Delivery<'a> {
    message_id: &'a str,
    message_type: &'a str,
    timestamp: &'a str,
    subscription_type: &'a str,
    subscription_version: &'a str,
    signature: Option<String>,
    body: &'a str,
}

impl<'a> Delivery<'a> {
    fn challenge() -> Self {
        Self {
            message_id: CHALLENGE_ID,
            message_type: "webhook_callback_verification",
            timestamp: CHALLENGE_TIMESTAMP,
            subscription_type: "channel.update",
            subscription_version: "1",
            signature: Some(CHALLENGE_SIGNATURE.to_string()),
            body: CHALLENGE_BODY,
        }
    }

    fn stream_online(message_id: &'a str) -> Self {
        Self {
            message_id,
            message_type: "notification",
            timestamp: NOTIFICATION_TIMESTAMP,
            subscription_type: "stream.online",
            subscription_version: "1",
            signature: signature::sign(
                SECRET,
                message_id,
                NOTIFICATION_TIMESTAMP,
                STREAM_ONLINE_BODY.as_bytes(),
            ),
            body: STREAM_ONLINE_BODY,
        }
    }

    fn into_request(self) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(WEBHOOK_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .header("Twitch-Eventsub-Message-Id", self.message_id)
            .header("Twitch-Eventsub-Message-Retry", "0")
            .header("Twitch-Eventsub-Message-Type", self.message_type)
            .header("Twitch-Eventsub-Message-Timestamp", self.timestamp)
            .header("Twitch-Eventsub-Subscription-Type", self.subscription_type)
            .header(
                "Twitch-Eventsub-Subscription-Version",
                self.subscription_version,
            );
        if let Some(signature) = self.signature {
            builder = builder.header("Twitch-Eventsub-Message-Signature", signature);
        }
        builder.body(Body::from(self.body.to_string())).unwrap()
    }
}

fn router(handler: NotificationHandler) -> Router {
    webhook_routes(WEBHOOK_PATH, handler)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn stream_online_table(tx: mpsc::UnboundedSender<Notification<StreamOnline>>) -> DispatchTable {
    DispatchTable::builder()
        .on("stream.online", "1", move |n: Notification<StreamOnline>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(n);
            }
        })
        .build()
}

// =============================================================================
// Challenge
// =============================================================================

#[tokio::test]
async fn signed_challenge_is_echoed_as_plain_text() {
    let handler = NotificationHandler::new(DispatchTable::default()).with_secret(SECRET);

    let response = router(handler)
        .oneshot(Delivery::challenge().into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(
        body_text(response).await,
        "olYc8-klwIH9BthhWWhTU-AhJQ0eatixVF2y6x3G5kk"
    );
}

#[tokio::test]
async fn challenge_with_altered_signature_is_forbidden() {
    let handler = NotificationHandler::new(DispatchTable::default()).with_secret(SECRET);
    let mut delivery = Delivery::challenge();
    delivery.signature = Some(
        "sha256=9afe337a0526eda98c12cd5c6892f5eec5c86a2f0fde7e0655764382d464bce9".to_string(),
    );

    let response = router(handler)
        .oneshot(delivery.into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(response).await, "Invalid signature");
}

#[tokio::test]
async fn unsigned_delivery_is_forbidden_when_secret_is_set() {
    let handler = NotificationHandler::new(DispatchTable::default()).with_secret(SECRET);
    let mut delivery = Delivery::challenge();
    delivery.signature = None;

    let response = router(handler)
        .oneshot(delivery.into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn refused_challenge_is_bad_request() {
    let handler = NotificationHandler::new(DispatchTable::default())
        .with_secret(SECRET)
        .with_challenge_verifier(|_headers, _challenge| false);

    let response = router(handler)
        .oneshot(Delivery::challenge().into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Method
// =============================================================================

#[tokio::test]
async fn get_is_method_not_allowed_with_allow_header() {
    let handler = NotificationHandler::new(DispatchTable::default()).with_secret(SECRET);

    let response = router(handler)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(WEBHOOK_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
}

// =============================================================================
// Notifications
// =============================================================================

#[tokio::test]
async fn notification_reaches_registered_callback() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler = NotificationHandler::new(stream_online_table(tx)).with_secret(SECRET);

    let response = router(handler)
        .oneshot(Delivery::stream_online("msg-1").into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    let notification = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("callback was not invoked")
        .unwrap();
    assert_eq!(notification.headers.message_id, "msg-1");
    assert_eq!(notification.subscription.event_type, "stream.online");
    assert_eq!(notification.event.broadcaster_user_login, "cool_user");
    assert_eq!(notification.event.stream_type, "live");
}

#[tokio::test]
async fn unsupported_type_is_bad_request_and_not_dispatched() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler = NotificationHandler::new(stream_online_table(tx)).with_secret(SECRET);
    let mut delivery = Delivery::stream_online("msg-2");
    delivery.subscription_version = "beta";

    let response = router(handler)
        .oneshot(delivery.into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn redelivered_message_is_acknowledged_once_dispatched_once() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let duplicates = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&duplicates);
    let handler = NotificationHandler::new(stream_online_table(tx))
        .with_secret(SECRET)
        .with_tracker(Arc::new(InMemoryMessageTracker::new()))
        .on_duplicate(move |_headers| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
    let app = router(handler);

    let first = app
        .clone()
        .oneshot(Delivery::stream_online("msg-3").into_request())
        .await
        .unwrap();
    let second = app
        .oneshot(Delivery::stream_online("msg-3").into_request())
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_text(second).await, "OK");
    assert_eq!(duplicates.load(Ordering::SeqCst), 1);

    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("first delivery was not dispatched")
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn malformed_event_payload_is_bad_request() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let handler = NotificationHandler::new(stream_online_table(tx)).with_secret(SECRET);
    let body = STREAM_ONLINE_BODY.replace(r#""started_at": "2023-03-09T04:59:59.000000000Z""#, r#""started_at": 12"#);
    let mut delivery = Delivery::stream_online("msg-4");
    delivery.signature = signature::sign(
        SECRET,
        "msg-4",
        NOTIFICATION_TIMESTAMP,
        body.as_bytes(),
    );
    delivery.body = &body;

    let response = router(handler)
        .oneshot(delivery.into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
