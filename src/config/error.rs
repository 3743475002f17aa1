//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid provider API URL: {0}")]
    InvalidApiUrl(String),

    #[error("Provider request timeout must be between 1 and 60 seconds")]
    InvalidProviderTimeout,

    #[error("Page size must be between 1 and 100")]
    InvalidPageSize,

    #[error("Maximum page count must be at least 1")]
    InvalidMaxPages,

    #[error("Webhook path must start with '/'")]
    InvalidWebhookPath,

    #[error("Webhook secret must be between 10 and 100 characters")]
    InvalidWebhookSecret,

    #[error("Provider client id and app token must be set together")]
    IncompleteCredentials,
}
