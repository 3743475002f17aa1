//! HTTP adapter for the webhook endpoint.

mod handlers;
mod routes;

pub use handlers::receive_webhook;
pub use routes::webhook_routes;
