//! Webhook endpoint configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Webhook endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Route the provider posts to
    #[serde(default = "default_path")]
    pub path: String,

    /// Shared signing secret; signatures are not checked when unset
    pub secret: Option<SecretString>,

    /// Drop redelivered message ids
    #[serde(default = "default_deduplicate")]
    pub deduplicate: bool,
}

impl WebhookConfig {
    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.path.starts_with('/') {
            return Err(ValidationError::InvalidWebhookPath);
        }
        if let Some(secret) = &self.secret {
            let len = secret.expose_secret().chars().count();
            if !(10..=100).contains(&len) {
                return Err(ValidationError::InvalidWebhookSecret);
            }
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            secret: None,
            deduplicate: default_deduplicate(),
        }
    }
}

fn default_path() -> String {
    "/webhooks/eventsub".to_string()
}

fn default_deduplicate() -> bool {
    true
}
