//! MessageTracker port - Deduplication of webhook deliveries.
//!
//! The provider redelivers a message when it does not see a timely 2xx, so
//! the same message id can arrive more than once, possibly out of order and
//! concurrently. A tracker records which ids have been seen so application
//! callbacks run at most once per id for as long as the tracker remembers it.

use async_trait::async_trait;
use thiserror::Error;

/// Port for recording seen message ids.
///
/// `add_and_check_if_duplicate` must be atomic with respect to concurrent
/// callers: for a given id exactly one caller observes `false`.
///
/// # Example
///
/// ```ignore
/// if tracker.add_and_check_if_duplicate(&headers.message_id).await? {
///     return Ok(WebhookReply::Duplicate);
/// }
/// ```
#[async_trait]
pub trait MessageTracker: Send + Sync {
    /// Mark `message_id` as seen.
    ///
    /// Returns `true` if it had already been seen before this call.
    async fn add_and_check_if_duplicate(&self, message_id: &str) -> Result<bool, TrackerError>;
}

/// Failure of the backing store.
#[derive(Debug, Clone, Error)]
#[error("Message tracker failure: {message}")]
pub struct TrackerError {
    pub message: String,
}

impl TrackerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
