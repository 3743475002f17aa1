//! HTTP handler for the webhook endpoint.
//!
//! Connects the axum route to the [`NotificationHandler`] pipeline.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response};

use crate::adapters::webhook::NotificationHandler;

/// Receive one webhook delivery.
///
/// Accepts any method so that non-POST requests get the pipeline's 405
/// instead of the router's default.
pub async fn receive_webhook(
    State(handler): State<NotificationHandler>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match handler.handle(&method, &headers, &body).await {
        Ok(reply) => reply.into_response(),
        Err(rejection) => rejection.into_response(),
    }
}
