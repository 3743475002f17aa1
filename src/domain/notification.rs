//! Inbound webhook message types.
//!
//! Every delivery carries a set of provider headers ([`NotificationHeaders`])
//! and a JSON body whose shape depends on the message type: a
//! [`SubscriptionChallenge`] during callback verification, or an
//! [`EventNotification`] envelope once the subscription is enabled.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;
use std::str::FromStr;

use super::subscription::Subscription;

// ════════════════════════════════════════════════════════════════════════════════
// Headers
// ════════════════════════════════════════════════════════════════════════════════

pub const MESSAGE_ID_HEADER: &str = "Twitch-Eventsub-Message-Id";
pub const MESSAGE_RETRY_HEADER: &str = "Twitch-Eventsub-Message-Retry";
pub const MESSAGE_TYPE_HEADER: &str = "Twitch-Eventsub-Message-Type";
pub const MESSAGE_SIGNATURE_HEADER: &str = "Twitch-Eventsub-Message-Signature";
pub const MESSAGE_TIMESTAMP_HEADER: &str = "Twitch-Eventsub-Message-Timestamp";
pub const SUBSCRIPTION_TYPE_HEADER: &str = "Twitch-Eventsub-Subscription-Type";
pub const SUBSCRIPTION_VERSION_HEADER: &str = "Twitch-Eventsub-Subscription-Version";

/// Provider headers attached to one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationHeaders {
    /// Unique per message; redeliveries reuse it.
    pub message_id: String,

    /// How many times this message has been retried.
    pub message_retry: u32,

    pub message_type: MessageType,

    /// `sha256=<hex>` signature, absent when the sender did not sign.
    pub message_signature: Option<String>,

    /// Timestamp exactly as sent; it is part of the signed message.
    pub message_timestamp: String,

    pub subscription_type: String,

    pub subscription_version: String,
}

/// Kind of webhook message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Challenge handshake proving callback ownership.
    WebhookCallbackVerification,

    /// Event notification for an enabled subscription.
    Notification,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::WebhookCallbackVerification => "webhook_callback_verification",
            MessageType::Notification => "notification",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message type string outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessageType(pub String);

impl fmt::Display for UnknownMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown message type '{}'", self.0)
    }
}

impl std::error::Error for UnknownMessageType {}

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webhook_callback_verification" => Ok(MessageType::WebhookCallbackVerification),
            "notification" => Ok(MessageType::Notification),
            other => Err(UnknownMessageType(other.to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Bodies
// ════════════════════════════════════════════════════════════════════════════════

/// Body of a `webhook_callback_verification` message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubscriptionChallenge {
    /// Token to echo back byte for byte.
    pub challenge: String,

    pub subscription: Subscription,
}

/// Outer envelope of a `notification` message.
///
/// The event payload stays undecoded until the dispatch table picks the
/// concrete type for the subscription's type and version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventNotification {
    pub subscription: Subscription,

    pub event: Box<RawValue>,
}

impl EventNotification {
    /// Raw JSON text of the event payload.
    pub fn raw_event(&self) -> &str {
        self.event.get()
    }
}

/// A decoded notification handed to an application callback.
#[derive(Debug, Clone)]
pub struct Notification<T> {
    pub headers: NotificationHeaders,
    pub subscription: Subscription,
    pub event: T,
}
