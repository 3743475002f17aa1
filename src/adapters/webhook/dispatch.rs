//! Static mapping from `(event type, version)` to decode-and-invoke closures.
//!
//! The table is assembled once at startup with [`DispatchTableBuilder`] and
//! is read-only afterwards, so it can be shared across requests behind an
//! `Arc` without locking.
//!
//! # Example
//!
//! ```ignore
//! let table = DispatchTable::builder()
//!     .on("stream.online", "1", |n: Notification<StreamOnline>| async move {
//!         tracing::info!(broadcaster = %n.event.broadcaster_user_login, "went live");
//!     })
//!     .declare("channel.update", "2")
//!     .build();
//! ```

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

use crate::domain::notification::{EventNotification, Notification, NotificationHeaders};

type DispatchFn = Box<
    dyn Fn(NotificationHeaders, EventNotification) -> Result<(), serde_json::Error> + Send + Sync,
>;

/// A registered subscription type and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey {
    pub event_type: String,
    pub version: String,
}

impl DispatchKey {
    pub fn new(event_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            version: version.into(),
        }
    }
}

/// One supported `(type, version)` pair.
///
/// An entry without a callback accepts the notification without decoding it.
pub struct DispatchEntry {
    invoke: Option<DispatchFn>,
}

impl DispatchEntry {
    /// Whether a callback is registered for this entry.
    pub fn has_callback(&self) -> bool {
        self.invoke.is_some()
    }

    /// Decode the payload and start the callback.
    ///
    /// Returns once the payload is decoded; the callback itself runs on a
    /// detached task and is never awaited.
    pub fn dispatch(
        &self,
        headers: NotificationHeaders,
        envelope: EventNotification,
    ) -> Result<(), serde_json::Error> {
        match &self.invoke {
            Some(invoke) => invoke(headers, envelope),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("has_callback", &self.has_callback())
            .finish()
    }
}

/// Entries by event type, then version.
type EntryMap = HashMap<String, HashMap<String, DispatchEntry>>;

/// Immutable dispatch table.
#[derive(Debug, Default)]
pub struct DispatchTable {
    entries: EntryMap,
}

impl DispatchTable {
    pub fn builder() -> DispatchTableBuilder {
        DispatchTableBuilder::default()
    }

    /// Find the entry for a subscription type and version.
    pub fn lookup(&self, event_type: &str, version: &str) -> Option<&DispatchEntry> {
        self.entries.get(event_type)?.get(version)
    }

    /// Registered keys in sorted order.
    pub fn supported(&self) -> Vec<DispatchKey> {
        let mut keys: Vec<_> = self
            .entries
            .iter()
            .flat_map(|(event_type, versions)| {
                versions
                    .keys()
                    .map(move |version| DispatchKey::new(event_type.as_str(), version.as_str()))
            })
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`DispatchTable`].
///
/// Registering the same key twice replaces the earlier entry.
#[derive(Default)]
pub struct DispatchTableBuilder {
    entries: EntryMap,
}

impl DispatchTableBuilder {
    /// Register an async callback for `(event_type, version)`.
    ///
    /// Each dispatched notification spawns a new tokio task running the
    /// callback inside an `eventsub_callback` span.
    pub fn on<T, F, Fut>(
        self,
        event_type: impl Into<String>,
        version: impl Into<String>,
        callback: F,
    ) -> Self
    where
        T: DeserializeOwned + Send + 'static,
        F: Fn(Notification<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let callback = Arc::new(callback);
        let invoke = move |headers: NotificationHeaders,
                           envelope: EventNotification|
              -> Result<(), serde_json::Error> {
            let notification = decode::<T>(headers, envelope)?;
            let span = callback_span(&notification.headers);
            let callback = Arc::clone(&callback);
            tokio::spawn(async move { callback(notification).await }.instrument(span));
            Ok(())
        };

        self.insert(event_type, version, Some(Box::new(invoke)))
    }

    /// Register a synchronous callback that runs on the blocking thread pool.
    pub fn on_blocking<T, F>(
        self,
        event_type: impl Into<String>,
        version: impl Into<String>,
        callback: F,
    ) -> Self
    where
        T: DeserializeOwned + Send + 'static,
        F: Fn(Notification<T>) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let invoke = move |headers: NotificationHeaders,
                           envelope: EventNotification|
              -> Result<(), serde_json::Error> {
            let notification = decode::<T>(headers, envelope)?;
            let span = callback_span(&notification.headers);
            let callback = Arc::clone(&callback);
            tokio::task::spawn_blocking(move || {
                let _entered = span.enter();
                callback(notification)
            });
            Ok(())
        };

        self.insert(event_type, version, Some(Box::new(invoke)))
    }

    /// Mark `(event_type, version)` as supported without a callback.
    pub fn declare(self, event_type: impl Into<String>, version: impl Into<String>) -> Self {
        self.insert(event_type, version, None)
    }

    fn insert(
        mut self,
        event_type: impl Into<String>,
        version: impl Into<String>,
        invoke: Option<DispatchFn>,
    ) -> Self {
        self.entries
            .entry(event_type.into())
            .or_default()
            .insert(version.into(), DispatchEntry { invoke });
        self
    }

    pub fn build(self) -> DispatchTable {
        DispatchTable {
            entries: self.entries,
        }
    }
}

fn decode<T: DeserializeOwned>(
    headers: NotificationHeaders,
    envelope: EventNotification,
) -> Result<Notification<T>, serde_json::Error> {
    let event: T = serde_json::from_str(envelope.raw_event())?;
    Ok(Notification {
        headers,
        subscription: envelope.subscription,
        event,
    })
}

fn callback_span(headers: &NotificationHeaders) -> tracing::Span {
    tracing::info_span!(
        "eventsub_callback",
        message_id = %headers.message_id,
        subscription_type = %headers.subscription_type,
        subscription_version = %headers.subscription_version,
    )
}
