//! Subscription management API adapter.

mod helix_client;
mod wire_types;

pub use helix_client::{
    HelixConfig, HelixSubscriptionClient, CLIENT_ID_HEADER, DEFAULT_API_URL,
};
