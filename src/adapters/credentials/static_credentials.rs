//! Fixed credentials loaded once at startup.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::ports::{CredentialError, CredentialProvider};

/// Credential provider returning the same client id and app token on every call.
///
/// Suitable when the token is minted out of band and rotated by restarting.
#[derive(Clone)]
pub struct StaticCredentials {
    client_id: String,
    app_token: SecretString,
}

impl StaticCredentials {
    pub fn new(client_id: impl Into<String>, app_token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            app_token: SecretString::new(app_token.into()),
        }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("client_id", &self.client_id)
            .field("app_token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn client_id(&self) -> Result<String, CredentialError> {
        if self.client_id.is_empty() {
            return Err(CredentialError::unavailable("client id is empty"));
        }
        Ok(self.client_id.clone())
    }

    async fn app_token(&self) -> Result<SecretString, CredentialError> {
        Ok(self.app_token.clone())
    }
}
