//! EventSub - Subscription management and webhook notification handling
//!
//! This crate registers interest in provider event types through the
//! subscription management API and receives the resulting push
//! notifications over HTTP, authenticating, deduplicating and routing each
//! one to a typed application callback.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
