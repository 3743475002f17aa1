//! Environment-driven settings for the webhook receiver and subscription client.
//!
//! Variables use the `EVENTSUB` prefix with `__` between path segments, so
//! `EVENTSUB__WEBHOOK__SECRET` lands in `webhook.secret`. A `.env` file in
//! the working directory is read first when present.
//!
//! ```no_run
//! use eventsub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration should load");
//! config.validate().expect("configuration should be valid");
//! println!("serving {}", config.webhook.path);
//! ```

mod error;
mod provider;
mod server;
mod webhook;

pub use error::{ConfigError, ValidationError};
pub use provider::ProviderConfig;
pub use server::{Environment, ServerConfig};
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// All settings, grouped by concern
///
/// Every section has defaults, so an empty environment yields a webhook
/// receiver on `0.0.0.0:8080` with signature checks disabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Credentials, endpoint and paging for the subscription API
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Route, signing secret and deduplication for inbound deliveries
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Read `.env` (if any) and the `EVENTSUB__*` variables
    ///
    /// - `EVENTSUB__SERVER__PORT=8080` -> `server.port`
    /// - `EVENTSUB__PROVIDER__CLIENT_ID=...` -> `provider.client_id`
    /// - `EVENTSUB__WEBHOOK__DEDUPLICATE=false` -> `webhook.deduplicate`
    ///
    /// # Errors
    ///
    /// `ConfigError::LoadError` when a value does not fit its field type.
    /// Range checks are left to [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = config::Environment::default()
            .prefix("EVENTSUB")
            .prefix_separator("__")
            .separator("__");

        Ok(config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?)
    }

    /// Check each section in turn, stopping at the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.provider.validate()?;
        self.webhook.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
