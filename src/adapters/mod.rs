//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `credentials` - Credential providers
//! - `tracker` - Message trackers for webhook deduplication
//! - `helix` - Subscription management API client
//! - `webhook` - Signature checks, dispatch table and the notification pipeline
//! - `http` - axum routes for the webhook endpoint

pub mod credentials;
pub mod helix;
pub mod http;
pub mod tracker;
pub mod webhook;

pub use credentials::StaticCredentials;
pub use helix::{HelixConfig, HelixSubscriptionClient};
pub use tracker::{InMemoryMessageTracker, TrackerFn};
pub use webhook::{DispatchTable, NotificationHandler, WebhookRejection, WebhookReply};
