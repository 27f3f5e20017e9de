use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt::Debug;

use crate::domain::DomainError;

/// A short-lived bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Value for the `Authorization` header
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[hidden]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Google service account identity used to sign token assertions
#[derive(Clone, Default)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
}

impl ServiceAccountCredentials {
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.client_email.trim().is_empty() && !self.private_key.trim().is_empty()
    }

    /// Private key with literal `\n` escapes turned into newlines, as they
    /// arrive when the PEM is pasted into an environment variable
    pub fn private_key_pem(&self) -> String {
        self.private_key.replace("\\n", "\n").trim_matches('"').to_string()
    }

    /// Stable hex digest identifying this credential pair
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.client_email.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.private_key.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"[hidden]")
            .finish()
    }
}

/// Source of bearer tokens for the spreadsheet API
#[async_trait]
pub trait AccessTokenProvider: Send + Sync + Debug {
    async fn access_token(&self) -> Result<AccessToken, DomainError>;

    fn provider_name(&self) -> &'static str;
}
