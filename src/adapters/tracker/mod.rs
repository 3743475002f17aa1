//! Message tracker adapters.
//!
//! - `InMemoryMessageTracker` - Process-local set of seen ids
//! - `TrackerFn` - Wraps an async closure

mod in_memory;
mod tracker_fn;

pub use in_memory::InMemoryMessageTracker;
pub use tracker_fn::TrackerFn;
