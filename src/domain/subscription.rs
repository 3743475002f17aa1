//! Subscription types as exchanged with the subscription management API.
//!
//! A subscription binds an event type and version, plus an opaque condition,
//! to a delivery transport. The provider owns subscription state; this crate
//! only creates, observes and deletes it.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version used when a request does not name one.
pub const DEFAULT_SUBSCRIPTION_VERSION: &str = "1";

/// Transport method for push delivery over HTTP.
pub const WEBHOOK_TRANSPORT_METHOD: &str = "webhook";

/// A subscription as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Provider-assigned subscription identifier.
    pub id: String,

    /// Current lifecycle status.
    pub status: SubscriptionStatus,

    /// Event type (e.g., "channel.update").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Schema version of the event payload.
    pub version: String,

    /// Event-type specific parameters, kept opaque.
    #[serde(default)]
    pub condition: serde_json::Value,

    /// Delivery transport.
    pub transport: Transport,

    /// When the provider created the subscription.
    pub created_at: DateTime<Utc>,

    /// Quota units this subscription consumes.
    #[serde(default)]
    pub cost: i64,
}

/// Delivery transport of a subscription.
///
/// The provider never echoes the secret back, so it is optional on the
/// read side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transport {
    pub method: String,
    pub callback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Status
// ════════════════════════════════════════════════════════════════════════════════

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    /// The callback was verified and notifications are flowing.
    Enabled,

    /// The provider is still verifying callback ownership.
    VerificationPending,

    /// The callback did not answer the challenge correctly.
    VerificationFailed,

    /// The provider revoked the subscription.
    Revoked(RevocationReason),

    /// A status string this crate does not know about.
    Unknown(String),
}

/// Why the provider revoked a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevocationReason {
    /// Too many notification deliveries failed.
    NotificationFailuresExceeded,

    /// A user in the condition revoked the authorization.
    AuthorizationRevoked,

    /// The authorizing moderator lost moderator status.
    ModeratorRemoved,

    /// A user in the condition no longer exists.
    UserRemoved,

    /// The subscription type and version is no longer supported.
    VersionRemoved,

    /// A beta subscription type went into maintenance.
    BetaMaintenance,
}

impl SubscriptionStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Enabled => "enabled",
            SubscriptionStatus::VerificationPending => "webhook_callback_verification_pending",
            SubscriptionStatus::VerificationFailed => "webhook_callback_verification_failed",
            SubscriptionStatus::Revoked(reason) => reason.as_str(),
            SubscriptionStatus::Unknown(raw) => raw,
        }
    }

    /// Check if the provider has given up on this subscription.
    pub fn is_revoked(&self) -> bool {
        matches!(self, SubscriptionStatus::Revoked(_))
    }
}

impl RevocationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevocationReason::NotificationFailuresExceeded => "notification_failures_exceeded",
            RevocationReason::AuthorizationRevoked => "authorization_revoked",
            RevocationReason::ModeratorRemoved => "moderator_removed",
            RevocationReason::UserRemoved => "user_removed",
            RevocationReason::VersionRemoved => "version_removed",
            RevocationReason::BetaMaintenance => "beta_maintenance",
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "enabled" => SubscriptionStatus::Enabled,
            "webhook_callback_verification_pending" => SubscriptionStatus::VerificationPending,
            "webhook_callback_verification_failed" => SubscriptionStatus::VerificationFailed,
            "notification_failures_exceeded" => {
                SubscriptionStatus::Revoked(RevocationReason::NotificationFailuresExceeded)
            }
            "authorization_revoked" => {
                SubscriptionStatus::Revoked(RevocationReason::AuthorizationRevoked)
            }
            "moderator_removed" => SubscriptionStatus::Revoked(RevocationReason::ModeratorRemoved),
            "user_removed" => SubscriptionStatus::Revoked(RevocationReason::UserRemoved),
            "version_removed" => SubscriptionStatus::Revoked(RevocationReason::VersionRemoved),
            "beta_maintenance" => SubscriptionStatus::Revoked(RevocationReason::BetaMaintenance),
            _ => SubscriptionStatus::Unknown(raw),
        }
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        match status {
            SubscriptionStatus::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Requests and listings
// ════════════════════════════════════════════════════════════════════════════════

/// Input to subscription creation. Never persisted locally.
#[derive(Debug, Clone)]
pub struct SubscriptionRequest {
    /// Event type to subscribe to.
    pub event_type: String,

    /// Schema version; `None` or empty falls back to [`DEFAULT_SUBSCRIPTION_VERSION`].
    pub version: Option<String>,

    /// Parameters under which the event fires.
    pub condition: serde_json::Value,

    /// Webhook callback URL.
    pub callback: String,

    /// Shared secret the provider signs notifications with.
    pub secret: SecretString,
}

impl SubscriptionRequest {
    pub fn new(
        event_type: impl Into<String>,
        condition: serde_json::Value,
        callback: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            version: None,
            condition,
            callback: callback.into(),
            secret: SecretString::new(secret.into()),
        }
    }

    /// Pin a schema version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The version that will be sent to the provider.
    pub fn effective_version(&self) -> &str {
        match self.version.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => DEFAULT_SUBSCRIPTION_VERSION,
        }
    }
}

/// Subscriptions plus quota accounting, as returned by create and list calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionList {
    #[serde(default)]
    pub data: Vec<Subscription>,

    /// Number of subscriptions counted against the application.
    #[serde(default)]
    pub total: i64,

    /// Current sum of all subscription costs.
    #[serde(default)]
    pub total_cost: i64,

    /// The application's cost limit.
    #[serde(default)]
    pub max_total_cost: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl SubscriptionList {
    /// Cursor for the next page, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.cursor.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Quota units still available.
    pub fn remaining_cost(&self) -> i64 {
        self.max_total_cost - self.total_cost
    }
}

/// Opaque continuation token. An absent or empty cursor marks the last page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}
