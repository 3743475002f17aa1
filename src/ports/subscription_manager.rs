//! SubscriptionManager port - Create, delete and list EventSub subscriptions.
//!
//! The provider owns all subscription state. Implementations translate each
//! call into one or more authenticated requests against the management API
//! and map every failure into [`SubscriptionError`].

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::domain::subscription::{SubscriptionList, SubscriptionRequest, SubscriptionStatus};

use super::credential_provider::CredentialError;

/// Port for managing subscriptions on the provider.
#[async_trait]
pub trait SubscriptionManager: Send + Sync {
    /// Create a webhook subscription.
    ///
    /// On success the provider answers with a single-element list and the
    /// caller's current quota usage. The new subscription is normally in
    /// verification-pending state until the challenge is answered.
    async fn subscribe(
        &self,
        request: SubscriptionRequest,
    ) -> Result<SubscriptionList, SubscriptionError>;

    /// Delete a subscription by id.
    async fn unsubscribe(&self, subscription_id: &str) -> Result<(), SubscriptionError>;

    /// List subscriptions, optionally filtered by status.
    ///
    /// Follows pagination until the last page and returns every subscription
    /// in page order. Quota totals come from the first page.
    async fn get_subscriptions(
        &self,
        status: Option<SubscriptionStatus>,
    ) -> Result<SubscriptionList, SubscriptionError>;
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Structured error body returned by the provider on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderError {
    /// Short error name (e.g., "Unauthorized").
    pub error: String,

    /// HTTP status echoed by the provider.
    pub status: u16,

    /// Human-readable explanation, may be empty.
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} {}", self.status, self.error)
        } else {
            write!(f, "{} {}: {}", self.status, self.error, self.message)
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors from subscription management operations.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Credentials could not be obtained; no request was sent.
    #[error("Failed to obtain credentials: {0}")]
    Credentials(#[from] CredentialError),

    /// The request did not complete within the configured timeout.
    #[error("Request to subscription API timed out")]
    Timeout,

    /// Connection-level failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with a structured error body.
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    /// Non-2xx response without a parseable error body.
    #[error("Unexpected response status {status}: {reason}")]
    UnexpectedResponse { status: u16, reason: String },

    /// A 2xx response whose body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built from the given input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider kept returning cursors past the page limit.
    #[error("Pagination did not terminate after {pages} pages")]
    PaginationLoop { pages: u32 },
}

impl SubscriptionError {
    /// Check if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubscriptionError::Timeout | SubscriptionError::Transport(_))
    }

    /// HTTP status reported by the provider, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubscriptionError::Provider(e) => Some(e.status),
            SubscriptionError::UnexpectedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
