//! Service-account authorization for the Play Developer API.
//!
//! The publisher only needs a bearer token; [`TokenProvider`] is the seam it
//! sees. [`ServiceAccountAuth`] obtains one with the OAuth2 JWT-bearer grant
//! from a Google service-account JSON key.

mod jwt;

pub use jwt::{Claims, parse_private_key, sign_assertion};

use crate::error::{PublishError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// OAuth2 scope granting access to the Android Publisher API
pub const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

/// Token endpoint used when the key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Bearer token for the Play API
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token value
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for the `Authorization` header
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// Source of bearer tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a token valid for the whole publish run.
    async fn access_token(&self) -> Result<AccessToken>;
}

/// Fields of a service-account JSON key the publisher needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service-account email, the assertion issuer
    pub client_email: String,
    /// PKCS#8 PEM private key
    pub private_key: String,
    /// Token endpoint
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Load a key from a JSON file
    pub async fn from_file(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PublishError::Auth {
                reason: format!("failed to read key file {}: {}", path.display(), e),
            })?;
        Self::from_json(&contents)
    }

    /// Parse a key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PublishError::Auth {
            reason: format!("invalid service-account key: {}", e),
        })
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Token provider backed by a service-account key
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scope: String,
    http: reqwest::Client,
}

impl ServiceAccountAuth {
    /// Create a provider for the Android Publisher scope
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            key,
            scope: ANDROID_PUBLISHER_SCOPE.to_string(),
            http,
        }
    }

    /// Signed assertion for the JWT-bearer grant, issued now
    pub fn assertion(&self) -> Result<String> {
        let signing_key = parse_private_key(&self.key.private_key)?;
        let claims = Claims::new(
            &self.key.client_email,
            &self.scope,
            self.key.token_uri(),
            chrono::Utc::now().timestamp(),
        );
        sign_assertion(&signing_key, &claims)
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<AccessToken> {
        let assertion = self.assertion()?;
        log::info!(
            "Requesting access token for {} from {}",
            self.key.client_email,
            self.key.token_uri()
        );

        let response = self
            .http
            .post(self.key.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| PublishError::Auth {
                reason: format!("token request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(PublishError::Auth {
                reason: crate::http::failure_reason(response).await,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| PublishError::Auth {
            reason: format!("malformed token response: {}", e),
        })?;

        if let Some(expires_in) = token.expires_in {
            log::debug!("Access token expires in {}s", expires_in);
        }

        Ok(AccessToken::new(token.access_token))
    }
}
