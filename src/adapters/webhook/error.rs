//! Rejections produced by the webhook pipeline.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::ports::TrackerError;

use super::headers::HeaderError;

/// Why an inbound delivery was not accepted.
///
/// The `Display` text doubles as the plain-text response body.
#[derive(Debug, Error)]
pub enum WebhookRejection {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed headers: {0}")]
    MalformedHeaders(#[from] HeaderError),

    /// The challenge or notification envelope is not valid JSON of the expected shape.
    #[error("Invalid JSON body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Unsupported notification type and version")]
    UnsupportedEvent { event_type: String, version: String },

    #[error("Challenge rejected")]
    ChallengeRejected,

    /// The event payload did not decode into the registered type.
    #[error("Invalid notification")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Internal server error")]
    Tracker(#[from] TrackerError),
}

impl WebhookRejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookRejection::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebhookRejection::InvalidSignature => StatusCode::FORBIDDEN,
            WebhookRejection::MalformedHeaders(_)
            | WebhookRejection::InvalidBody(_)
            | WebhookRejection::UnsupportedEvent { .. }
            | WebhookRejection::ChallengeRejected
            | WebhookRejection::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookRejection::Tracker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_string();

        match self {
            WebhookRejection::MethodNotAllowed => {
                (status, [(header::ALLOW, "POST")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
