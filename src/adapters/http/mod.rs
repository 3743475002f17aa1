//! HTTP adapters - axum endpoint exposure.

pub mod webhook;

pub use webhook::webhook_routes;
