//! Subscription management API adapter.
//!
//! Implements the `SubscriptionManager` port over HTTPS with `reqwest`.
//!
//! # Behaviour
//!
//! - Credentials are fetched from the `CredentialProvider` on every call and
//!   never cached; a credential failure aborts before any request is sent
//! - Every request carries `Client-ID`, `Authorization: Bearer` and a
//!   per-request timeout
//! - Non-2xx responses are decoded into a structured `ProviderError` when the
//!   body allows it
//! - Listing follows cursors strictly forward and gives up after
//!   `max_pages` pages
//!
//! # Configuration
//!
//! ```ignore
//! let client = HelixSubscriptionClient::new(
//!     HelixConfig::default().with_timeout(Duration::from_secs(5)),
//!     Arc::new(StaticCredentials::new(client_id, app_token)),
//! );
//! ```

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::domain::subscription::{SubscriptionList, SubscriptionRequest, SubscriptionStatus};
use crate::ports::{
    CredentialProvider, ProviderError, SubscriptionError, SubscriptionManager,
};

use super::wire_types::{CreateSubscriptionBody, WebhookTransportBody};

/// Production subscriptions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.twitch.tv/helix/eventsub/subscriptions";

/// Header carrying the application client id.
pub const CLIENT_ID_HEADER: &str = "Client-ID";

/// Subscription API client configuration.
#[derive(Debug, Clone)]
pub struct HelixConfig {
    /// Subscriptions endpoint (default: production API).
    pub endpoint: String,

    /// Per-request timeout (default: 3 seconds).
    pub timeout: Duration,

    /// Page size requested when listing (default: 100, the API maximum).
    pub page_size: u32,

    /// Pages fetched before a listing is abandoned as runaway (default: 105).
    pub max_pages: u32,
}

impl HelixConfig {
    /// Point the client at another endpoint (for testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(3),
            page_size: 100,
            max_pages: 105,
        }
    }
}

impl From<&ProviderConfig> for HelixConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            endpoint: config.api_url.clone(),
            timeout: config.request_timeout(),
            page_size: config.page_size,
            max_pages: config.max_pages,
        }
    }
}

/// Subscription API client.
///
/// Implements `SubscriptionManager` against the provider's REST endpoint.
pub struct HelixSubscriptionClient {
    config: HelixConfig,
    credentials: Arc<dyn CredentialProvider>,
    http_client: reqwest::Client,
}

impl HelixSubscriptionClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HelixConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            credentials,
            http_client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing connection pool.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn config(&self) -> &HelixConfig {
        &self.config
    }

    /// Attach fresh credentials and the request timeout.
    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, SubscriptionError> {
        let client_id = self.credentials.client_id().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to obtain client id");
            SubscriptionError::from(e)
        })?;
        let token = self.credentials.app_token().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to obtain app token");
            SubscriptionError::from(e)
        })?;

        Ok(request
            .header(CLIENT_ID_HEADER, client_id)
            .bearer_auth(token.expose_secret())
            .header(ACCEPT, "application/json")
            .timeout(self.config.timeout))
    }

    /// Send a request, turning transport failures and non-2xx answers into errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, SubscriptionError> {
        let response = self
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn fetch_page(
        &self,
        query: &[(&str, String)],
        after: Option<&str>,
    ) -> Result<SubscriptionList, SubscriptionError> {
        let mut request = self.http_client.get(&self.config.endpoint).query(query);
        if let Some(cursor) = after {
            request = request.query(&[("after", cursor)]);
        }

        let response = self.send(request).await?;
        decode_body(response).await
    }
}

#[async_trait]
impl SubscriptionManager for HelixSubscriptionClient {
    async fn subscribe(
        &self,
        request: SubscriptionRequest,
    ) -> Result<SubscriptionList, SubscriptionError> {
        if request.event_type.is_empty() {
            return Err(SubscriptionError::InvalidRequest(
                "event type is required".to_string(),
            ));
        }
        if request.callback.is_empty() {
            return Err(SubscriptionError::InvalidRequest(
                "callback URL is required".to_string(),
            ));
        }

        let body = CreateSubscriptionBody {
            event_type: &request.event_type,
            version: request.effective_version(),
            condition: &request.condition,
            transport: WebhookTransportBody::new(
                &request.callback,
                request.secret.expose_secret(),
            ),
        };

        let response = self
            .send(self.http_client.post(&self.config.endpoint).json(&body))
            .await?;
        let list: SubscriptionList = decode_body(response).await?;

        tracing::info!(
            subscription_type = %request.event_type,
            subscription_version = %request.effective_version(),
            subscription_id = list.data.first().map(|s| s.id.as_str()).unwrap_or_default(),
            total_cost = list.total_cost,
            max_total_cost = list.max_total_cost,
            "Subscription created"
        );
        Ok(list)
    }

    async fn unsubscribe(&self, subscription_id: &str) -> Result<(), SubscriptionError> {
        if subscription_id.is_empty() {
            return Err(SubscriptionError::InvalidRequest(
                "subscription id is required".to_string(),
            ));
        }

        self.send(
            self.http_client
                .delete(&self.config.endpoint)
                .query(&[("id", subscription_id)]),
        )
        .await?;

        tracing::info!(subscription_id = %subscription_id, "Subscription deleted");
        Ok(())
    }

    async fn get_subscriptions(
        &self,
        status: Option<SubscriptionStatus>,
    ) -> Result<SubscriptionList, SubscriptionError> {
        let mut query = vec![("first", self.config.page_size.to_string())];
        if let Some(status) = &status {
            query.push(("status", status.as_str().to_string()));
        }

        let mut result = self.fetch_page(&query, None).await?;
        let mut cursor = result.next_cursor().map(str::to_owned);
        let mut pages: u32 = 1;

        while let Some(after) = cursor {
            if pages >= self.config.max_pages {
                tracing::error!(pages, "Subscription listing did not terminate");
                return Err(SubscriptionError::PaginationLoop { pages });
            }

            let page = self.fetch_page(&query, Some(&after)).await?;
            pages += 1;
            tracing::debug!(pages, received = page.data.len(), "Fetched subscription page");

            cursor = page.next_cursor().map(str::to_owned);
            result.data.extend(page.data);
        }

        result.pagination = None;
        tracing::debug!(pages, total = result.data.len(), "Listed subscriptions");
        Ok(result)
    }
}

fn transport_error(error: reqwest::Error) -> SubscriptionError {
    if error.is_timeout() {
        tracing::warn!(error = %error, "Subscription API request timed out");
        SubscriptionError::Timeout
    } else {
        tracing::warn!(error = %error, "Subscription API request failed");
        SubscriptionError::Transport(error.to_string())
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T, SubscriptionError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse subscription API response");
        SubscriptionError::Decode(e.to_string())
    })
}

async fn error_from_response(response: Response) -> SubscriptionError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();

    match serde_json::from_slice::<ProviderError>(&body) {
        Ok(provider_error) => {
            tracing::error!(
                status = provider_error.status,
                error = %provider_error.error,
                message = %provider_error.message,
                "Subscription API returned an error"
            );
            SubscriptionError::Provider(provider_error)
        }
        Err(_) => {
            tracing::error!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "Subscription API returned an unexpected response"
            );
            SubscriptionError::UnexpectedResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
        }
    }
}
