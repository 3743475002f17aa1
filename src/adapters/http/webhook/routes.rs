//! Axum router configuration for the webhook endpoint.

use axum::{routing::any, Router};

use crate::adapters::webhook::NotificationHandler;

use super::handlers::receive_webhook;

/// Create the webhook router.
///
/// # Routes
/// - `POST {path}` - Provider deliveries (other methods answer 405)
pub fn webhook_routes(path: &str, handler: NotificationHandler) -> Router {
    Router::new()
        .route(path, any(receive_webhook))
        .with_state(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::webhook::DispatchTable;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        webhook_routes(
            "/webhooks/eventsub",
            NotificationHandler::new(DispatchTable::default()),
        )
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/webhooks/eventsub")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/elsewhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_without_headers_is_bad_request() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhooks/eventsub")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
