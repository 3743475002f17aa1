//! Domain layer containing the EventSub vocabulary.
//!
//! # Module Organization
//!
//! - `subscription` - Subscriptions, statuses, creation requests, paged listings
//! - `notification` - Webhook headers, challenge and notification bodies
//! - `events` - Sample typed event payloads

pub mod events;
pub mod notification;
pub mod subscription;

pub use notification::{
    EventNotification, MessageType, Notification, NotificationHeaders, SubscriptionChallenge,
    UnknownMessageType,
};
pub use subscription::{
    Pagination, RevocationReason, Subscription, SubscriptionList, SubscriptionRequest,
    SubscriptionStatus, Transport, DEFAULT_SUBSCRIPTION_VERSION, WEBHOOK_TRANSPORT_METHOD,
};
