//! A sample of typed event payloads.
//!
//! Payload schemas are versioned data contracts owned by the provider. The
//! dispatch table decodes into any `DeserializeOwned` type, so applications
//! bring their own; these cover the events the bundled service listens to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condition shared by most channel-scoped subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcasterCondition {
    pub broadcaster_user_id: String,
}

/// Condition for `channel.follow` version 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowCondition {
    pub broadcaster_user_id: String,
    pub moderator_user_id: String,
}

/// `stream.online` version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOnline {
    pub id: String,
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    /// One of `live`, `playlist`, `watch_party`, `premiere`, `rerun`.
    #[serde(rename = "type")]
    pub stream_type: String,
    pub started_at: DateTime<Utc>,
}

/// `stream.offline` version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOffline {
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
}

/// `channel.update` version 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUpdate {
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    pub title: String,
    pub language: String,
    pub category_id: String,
    pub category_name: String,
    #[serde(default)]
    pub content_classification_labels: Vec<String>,
}

/// `channel.follow` version 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFollow {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub broadcaster_user_id: String,
    pub broadcaster_user_login: String,
    pub broadcaster_user_name: String,
    pub followed_at: DateTime<Utc>,
}
