//! Request bodies for the subscription management API.
//!
//! Responses decode straight into domain types; only the create body has a
//! shape of its own.

use serde::Serialize;

use crate::domain::subscription::WEBHOOK_TRANSPORT_METHOD;

/// Body of a create-subscription request.
#[derive(Debug, Serialize)]
pub struct CreateSubscriptionBody<'a> {
    #[serde(rename = "type")]
    pub event_type: &'a str,
    pub version: &'a str,
    pub condition: &'a serde_json::Value,
    pub transport: WebhookTransportBody<'a>,
}

/// Webhook transport with its signing secret.
#[derive(Debug, Serialize)]
pub struct WebhookTransportBody<'a> {
    pub method: &'static str,
    pub callback: &'a str,
    pub secret: &'a str,
}

impl<'a> WebhookTransportBody<'a> {
    pub fn new(callback: &'a str, secret: &'a str) -> Self {
        Self {
            method: WEBHOOK_TRANSPORT_METHOD,
            callback,
            secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_serializes_provider_shape() {
        let condition = json!({"broadcaster_user_id": "1337"});
        let body = CreateSubscriptionBody {
            event_type: "stream.online",
            version: "1",
            condition: &condition,
            transport: WebhookTransportBody::new("https://example.com/cb", "s3cre7-value"),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "type": "stream.online",
                "version": "1",
                "condition": {"broadcaster_user_id": "1337"},
                "transport": {
                    "method": "webhook",
                    "callback": "https://example.com/cb",
                    "secret": "s3cre7-value"
                }
            })
        );
    }
}
