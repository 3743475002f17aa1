//! Webhook receiving pipeline.
//!
//! - `signature` - HMAC-SHA256 signing and constant-time verification
//! - `headers` - Provider header extraction
//! - `dispatch` - Static `(type, version)` dispatch table
//! - `notification_handler` - Verification, deduplication, challenge and dispatch
//! - `error` - Rejections and their HTTP status codes

mod dispatch;
mod error;
mod headers;
mod notification_handler;
pub mod signature;

pub use dispatch::{DispatchEntry, DispatchKey, DispatchTable, DispatchTableBuilder};
pub use error::WebhookRejection;
pub use headers::HeaderError;
pub use notification_handler::{
    BeforeDispatchHook, ChallengeVerifier, DuplicateHook, NotificationHandler, WebhookReply,
};
