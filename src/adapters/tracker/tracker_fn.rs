//! Closure-backed message tracker.

use async_trait::async_trait;
use std::future::Future;

use crate::ports::{MessageTracker, TrackerError};

/// Adapts an async closure into a [`MessageTracker`].
///
/// Handy for wiring an external store without a dedicated type:
///
/// ```ignore
/// let tracker = TrackerFn::new(move |id: String| {
///     let store = store.clone();
///     async move { store.set_if_absent(&id).await.map(|inserted| !inserted) }
/// });
/// ```
pub struct TrackerFn<F> {
    check: F,
}

impl<F> TrackerFn<F> {
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

#[async_trait]
impl<F, Fut> MessageTracker for TrackerFn<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, TrackerError>> + Send,
{
    async fn add_and_check_if_duplicate(&self, message_id: &str) -> Result<bool, TrackerError> {
        (self.check)(message_id.to_string()).await
    }
}
