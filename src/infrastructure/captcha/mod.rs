//! reCAPTCHA token verification

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::DomainError;
use crate::infrastructure::http::{HttpClientTrait, HttpRequest};

pub const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Checks a client-supplied CAPTCHA token.
///
/// `Ok(false)` means the token was rejected; `Err` means verification could
/// not be performed.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync + std::fmt::Debug {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, DomainError>;
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Google reCAPTCHA `siteverify` client
#[derive(Debug)]
pub struct RecaptchaVerifier {
    client: Arc<dyn HttpClientTrait>,
    secret: String,
    verify_url: String,
}

impl RecaptchaVerifier {
    pub fn new(client: Arc<dyn HttpClientTrait>, secret: impl Into<String>) -> Self {
        Self::with_verify_url(client, secret, RECAPTCHA_VERIFY_URL)
    }

    pub fn with_verify_url(
        client: Arc<dyn HttpClientTrait>,
        secret: impl Into<String>,
        verify_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            secret: secret.into(),
            verify_url: verify_url.into(),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, DomainError> {
        let mut fields = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            fields.push(("remoteip", ip));
        }

        let request = HttpRequest::post(&self.verify_url)
            .service("recaptcha")
            .timeout(VERIFY_TIMEOUT)
            .form(fields);

        let response = self.client.send(request).await?;

        if !response.is_success() {
            return Err(DomainError::upstream(
                "recaptcha",
                format!("HTTP {}: {}", response.status, response.body_excerpt()),
            ));
        }

        let parsed: VerifyResponse = response.json().map_err(|e| {
            DomainError::upstream("recaptcha", format!("Failed to parse response: {}", e))
        })?;

        if !parsed.success {
            debug!(error_codes = ?parsed.error_codes, "CAPTCHA token rejected");
        }

        Ok(parsed.success)
    }
}
