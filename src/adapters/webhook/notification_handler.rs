//! Webhook notification handler.
//!
//! Runs every inbound delivery through the same pipeline:
//!
//! 1. Only `POST` is accepted
//! 2. The signature is checked against the raw body when a secret is set
//! 3. Provider headers are parsed
//! 4. The message id is checked against the tracker, if one is set
//! 5. Verification challenges are answered, notifications are dispatched
//!
//! The handler is transport-agnostic: it takes a method, a header map and
//! the buffered body, and returns either a [`WebhookReply`] or a
//! [`WebhookRejection`]. Both convert into axum responses.

use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::domain::notification::{
    EventNotification, MessageType, NotificationHeaders, SubscriptionChallenge,
    MESSAGE_ID_HEADER, MESSAGE_SIGNATURE_HEADER, MESSAGE_TIMESTAMP_HEADER,
};
use crate::ports::MessageTracker;

use super::dispatch::DispatchTable;
use super::error::WebhookRejection;
use super::headers::header_str;
use super::signature;

/// Decides whether a verification challenge should be answered.
pub type ChallengeVerifier =
    Arc<dyn Fn(&NotificationHeaders, &SubscriptionChallenge) -> bool + Send + Sync>;

/// Called when a delivery is dropped as a duplicate.
pub type DuplicateHook = Arc<dyn Fn(&NotificationHeaders) + Send + Sync>;

/// Called for every non-duplicate notification once its envelope is decoded,
/// before the dispatch table is consulted.
pub type BeforeDispatchHook = Arc<dyn Fn(&NotificationHeaders, &EventNotification) + Send + Sync>;

/// Successful outcome of a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookReply {
    /// Notification accepted.
    Accepted,

    /// Message id already seen; nothing was dispatched.
    Duplicate,

    /// Challenge accepted; the token is echoed back verbatim.
    Challenge(String),
}

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        match self {
            WebhookReply::Accepted | WebhookReply::Duplicate => {
                (StatusCode::OK, "OK").into_response()
            }
            WebhookReply::Challenge(token) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                token,
            )
                .into_response(),
        }
    }
}

/// Webhook pipeline with its optional collaborators.
///
/// Cheap to clone; all shared state sits behind `Arc`.
///
/// # Example
///
/// ```ignore
/// let handler = NotificationHandler::new(table)
///     .with_secret(secret)
///     .with_tracker(Arc::new(InMemoryMessageTracker::new()))
///     .on_duplicate(|h| tracing::info!(message_id = %h.message_id, "duplicate"));
/// ```
#[derive(Clone)]
pub struct NotificationHandler {
    secret: Option<SecretString>,
    tracker: Option<Arc<dyn MessageTracker>>,
    dispatch: Arc<DispatchTable>,
    challenge_verifier: Option<ChallengeVerifier>,
    duplicate_hook: Option<DuplicateHook>,
    before_dispatch: Option<BeforeDispatchHook>,
}

impl NotificationHandler {
    /// Handler with no secret, no tracker and no hooks.
    ///
    /// Without a secret, signatures are not checked at all.
    pub fn new(dispatch: impl Into<Arc<DispatchTable>>) -> Self {
        Self {
            secret: None,
            tracker: None,
            dispatch: dispatch.into(),
            challenge_verifier: None,
            duplicate_hook: None,
            before_dispatch: None,
        }
    }

    /// Require signatures made with `secret`.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Drop deliveries whose message id the tracker has already seen.
    pub fn with_tracker(mut self, tracker: Arc<dyn MessageTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Only answer challenges for which `verifier` returns true.
    pub fn with_challenge_verifier<F>(mut self, verifier: F) -> Self
    where
        F: Fn(&NotificationHeaders, &SubscriptionChallenge) -> bool + Send + Sync + 'static,
    {
        self.challenge_verifier = Some(Arc::new(verifier));
        self
    }

    pub fn on_duplicate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&NotificationHeaders) + Send + Sync + 'static,
    {
        self.duplicate_hook = Some(Arc::new(hook));
        self
    }

    pub fn before_dispatch<F>(mut self, hook: F) -> Self
    where
        F: Fn(&NotificationHeaders, &EventNotification) + Send + Sync + 'static,
    {
        self.before_dispatch = Some(Arc::new(hook));
        self
    }

    pub fn dispatch_table(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Process one delivery.
    pub async fn handle(
        &self,
        method: &Method,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<WebhookReply, WebhookRejection> {
        if *method != Method::POST {
            tracing::warn!(method = %method, "Rejected webhook with unsupported method");
            return Err(WebhookRejection::MethodNotAllowed);
        }

        if let Some(secret) = &self.secret {
            self.authenticate(secret, headers, body)?;
        }

        let parsed = NotificationHeaders::from_header_map(headers).map_err(|e| {
            tracing::warn!(error = %e, "Rejected webhook with malformed headers");
            WebhookRejection::from(e)
        })?;

        if let Some(tracker) = &self.tracker {
            let duplicate = tracker
                .add_and_check_if_duplicate(&parsed.message_id)
                .await
                .map_err(|e| {
                    tracing::error!(
                        message_id = %parsed.message_id,
                        error = %e,
                        "Message tracker failed"
                    );
                    WebhookRejection::from(e)
                })?;

            if duplicate {
                tracing::debug!(
                    message_id = %parsed.message_id,
                    message_retry = parsed.message_retry,
                    "Dropping duplicate delivery"
                );
                if let Some(hook) = &self.duplicate_hook {
                    hook(&parsed);
                }
                return Ok(WebhookReply::Duplicate);
            }
        }

        match parsed.message_type {
            MessageType::WebhookCallbackVerification => self.answer_challenge(&parsed, body),
            MessageType::Notification => self.dispatch_notification(parsed, body),
        }
    }

    fn authenticate(
        &self,
        secret: &SecretString,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<(), WebhookRejection> {
        let message_id = header_str(headers, MESSAGE_ID_HEADER).unwrap_or_default();
        let timestamp = header_str(headers, MESSAGE_TIMESTAMP_HEADER).unwrap_or_default();
        let supplied = header_str(headers, MESSAGE_SIGNATURE_HEADER).unwrap_or_default();

        if signature::verify(secret.expose_secret(), message_id, timestamp, body, supplied) {
            Ok(())
        } else {
            tracing::warn!(message_id = %message_id, "Rejected webhook with invalid signature");
            Err(WebhookRejection::InvalidSignature)
        }
    }

    fn answer_challenge(
        &self,
        headers: &NotificationHeaders,
        body: &[u8],
    ) -> Result<WebhookReply, WebhookRejection> {
        let challenge: SubscriptionChallenge = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(message_id = %headers.message_id, error = %e, "Invalid challenge body");
            WebhookRejection::InvalidBody(e)
        })?;

        let accepted = self
            .challenge_verifier
            .as_ref()
            .map_or(true, |verify| verify(headers, &challenge));

        if !accepted {
            tracing::warn!(
                message_id = %headers.message_id,
                subscription_id = %challenge.subscription.id,
                "Challenge rejected by verifier"
            );
            return Err(WebhookRejection::ChallengeRejected);
        }

        tracing::info!(
            subscription_id = %challenge.subscription.id,
            subscription_type = %challenge.subscription.event_type,
            "Answering verification challenge"
        );
        Ok(WebhookReply::Challenge(challenge.challenge))
    }

    fn dispatch_notification(
        &self,
        headers: NotificationHeaders,
        body: &[u8],
    ) -> Result<WebhookReply, WebhookRejection> {
        let envelope: EventNotification = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(message_id = %headers.message_id, error = %e, "Invalid notification body");
            WebhookRejection::InvalidBody(e)
        })?;

        if let Some(hook) = &self.before_dispatch {
            hook(&headers, &envelope);
        }

        let Some(entry) = self
            .dispatch
            .lookup(&headers.subscription_type, &headers.subscription_version)
        else {
            tracing::warn!(
                message_id = %headers.message_id,
                subscription_type = %headers.subscription_type,
                subscription_version = %headers.subscription_version,
                "Unsupported notification type and version"
            );
            return Err(WebhookRejection::UnsupportedEvent {
                event_type: headers.subscription_type,
                version: headers.subscription_version,
            });
        };

        let message_id = headers.message_id.clone();
        entry.dispatch(headers, envelope).map_err(|e| {
            tracing::warn!(message_id = %message_id, error = %e, "Failed to decode event payload");
            WebhookRejection::InvalidPayload(e)
        })?;

        tracing::debug!(message_id = %message_id, "Notification dispatched");
        Ok(WebhookReply::Accepted)
    }
}
