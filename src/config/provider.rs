//! Subscription API configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Subscription management API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Application client id, sent as `Client-ID`
    pub client_id: Option<String>,

    /// App access token
    pub app_token: Option<SecretString>,

    /// Subscriptions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Page size for listing subscriptions
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched by one listing call
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl ProviderConfig {
    /// Outbound request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check if both credentials are configured
    pub fn has_credentials(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.is_empty()) && self.app_token.is_some()
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(ValidationError::InvalidApiUrl(self.api_url.clone()));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidProviderTimeout);
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ValidationError::InvalidPageSize);
        }
        if self.max_pages == 0 {
            return Err(ValidationError::InvalidMaxPages);
        }
        if self.client_id.is_some() != self.app_token.is_some() {
            return Err(ValidationError::IncompleteCredentials);
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            app_token: None,
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.twitch.tv/helix/eventsub/subscriptions".to_string()
}

fn default_request_timeout() -> u64 {
    3
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    105
}
