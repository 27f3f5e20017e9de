//! Service-account token exchange (JWT bearer grant)

use async_trait::async_trait;
use chrono::Duration;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::domain::{
    AccessToken, AccessTokenProvider, Clock, DomainError, ServiceAccountCredentials,
};
use crate::infrastructure::http::{HttpClientTrait, HttpRequest};

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Read/write access to spreadsheets
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Validity window of an assertion and of the token it buys
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Claims of the signed assertion
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Exchanges a signed service-account assertion for a bearer token.
///
/// Holds no token state; every call performs one exchange.
#[derive(Debug)]
pub struct ServiceAccountTokenProvider {
    client: Arc<dyn HttpClientTrait>,
    credentials: ServiceAccountCredentials,
    token_url: String,
    clock: Arc<dyn Clock>,
}

impl ServiceAccountTokenProvider {
    pub fn new(
        client: Arc<dyn HttpClientTrait>,
        credentials: ServiceAccountCredentials,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_token_url(client, credentials, clock, GOOGLE_TOKEN_URL)
    }

    pub fn with_token_url(
        client: Arc<dyn HttpClientTrait>,
        credentials: ServiceAccountCredentials,
        clock: Arc<dyn Clock>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            token_url: token_url.into(),
            clock,
        }
    }

    pub fn credentials(&self) -> &ServiceAccountCredentials {
        &self.credentials
    }

    /// Builds and signs the RS256 assertion
    fn signed_assertion(&self) -> Result<String, DomainError> {
        if self.credentials.client_email.trim().is_empty() {
            return Err(DomainError::configuration(
                "Service account client email is not configured",
            ));
        }

        if self.credentials.private_key.trim().is_empty() {
            return Err(DomainError::configuration(
                "Service account private key is not configured",
            ));
        }

        let key = EncodingKey::from_rsa_pem(self.credentials.private_key_pem().as_bytes())
            .map_err(|e| {
                DomainError::configuration(format!("Invalid service account private key: {}", e))
            })?;

        let now = self.clock.now().timestamp();
        let claims = AssertionClaims {
            iss: self.credentials.client_email.clone(),
            scope: SHEETS_SCOPE.to_string(),
            aud: self.token_url.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| DomainError::auth(format!("Failed to sign token assertion: {}", e)))
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, DomainError> {
        let assertion = self.signed_assertion()?;
        let issued_at = self.clock.now();

        let request = HttpRequest::post(&self.token_url)
            .service("google-oauth")
            .form([("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]);

        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| DomainError::auth(format!("Token exchange failed: {}", e)))?;

        let parsed: Option<TokenResponse> = response.json().ok();

        if !response.is_success() {
            let detail = parsed
                .and_then(|r| r.error_description.or(r.error))
                .unwrap_or_else(|| response.body_excerpt());

            return Err(DomainError::auth(format!(
                "Token endpoint returned HTTP {}: {}",
                response.status, detail
            )));
        }

        let parsed = parsed.ok_or_else(|| {
            DomainError::auth("Token endpoint returned an unreadable response")
        })?;

        let token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::auth("Token endpoint response has no access_token"))?;

        let lifetime = parsed.expires_in.unwrap_or(TOKEN_LIFETIME_SECS);
        debug!(
            client_email = %self.credentials.client_email,
            expires_in = lifetime,
            "Obtained spreadsheet access token"
        );

        Ok(AccessToken::new(token, issued_at + Duration::seconds(lifetime)))
    }

    fn provider_name(&self) -> &'static str {
        "service_account"
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    pub const PRIVATE_KEY_PEM: &str = include_str!("testdata/service_account_key.pem");
    pub const PUBLIC_KEY_PEM: &str = include_str!("testdata/service_account_key.pub.pem");
}
