//! CredentialProvider port - Source of API credentials.
//!
//! The subscription client asks for a client identifier and an app access
//! token on every call and never caches them, so implementations are free
//! to refresh tokens behind the scenes.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

/// Port for obtaining provider API credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Application client identifier, sent as `Client-ID`.
    async fn client_id(&self) -> Result<String, CredentialError>;

    /// App access token, sent as `Authorization: Bearer <token>`.
    async fn app_token(&self) -> Result<SecretString, CredentialError>;
}

/// Failure to obtain a credential.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Credential unavailable: {0}")]
    Unavailable(String),

    #[error("Credential expired: {0}")]
    Expired(String),
}

impl CredentialError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::Expired(message.into())
    }
}
