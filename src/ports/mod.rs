//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CredentialProvider` - Client id and app token for the management API
//! - `MessageTracker` - Seen-message bookkeeping for webhook deduplication
//! - `SubscriptionManager` - Create, delete and list subscriptions

mod credential_provider;
mod message_tracker;
mod subscription_manager;

pub use credential_provider::{CredentialError, CredentialProvider};
pub use message_tracker::{MessageTracker, TrackerError};
pub use subscription_manager::{ProviderError, SubscriptionError, SubscriptionManager};
