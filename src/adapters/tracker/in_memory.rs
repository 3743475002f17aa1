//! In-memory message tracker implementation.
//!
//! Keeps every seen message id in a `HashSet` for the lifetime of the
//! process. Memory grows with the number of distinct ids; deployments that
//! need expiry or persistence plug in their own `MessageTracker`.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::ports::{MessageTracker, TrackerError};

/// In-memory implementation of the MessageTracker port.
///
/// Thread-safe via internal `Mutex`. The check and the insert happen under
/// one lock acquisition, so concurrent deliveries of the same id see exactly
/// one first-time result.
///
/// # Example
///
/// ```ignore
/// let tracker = InMemoryMessageTracker::new();
///
/// assert!(!tracker.add_and_check_if_duplicate("msg-1").await?);
/// assert!(tracker.add_and_check_if_duplicate("msg-1").await?);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMessageTracker {
    seen: Mutex<HashSet<String>>,
}

impl InMemoryMessageTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of distinct ids seen so far.
    pub fn len(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    /// Returns true if no ids have been seen.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageTracker for InMemoryMessageTracker {
    async fn add_and_check_if_duplicate(&self, message_id: &str) -> Result<bool, TrackerError> {
        let mut seen = self
            .seen
            .lock()
            .map_err(|_| TrackerError::new("seen-message set lock poisoned"))?;

        // `insert` returns false when the id was already present.
        Ok(!seen.insert(message_id.to_string()))
    }
}
