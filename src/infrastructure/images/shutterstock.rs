//! Shutterstock image search

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::{DomainError, ImageProvider};
use crate::infrastructure::http::{HttpClientTrait, HttpRequest};

pub const SHUTTERSTOCK_API_BASE_URL: &str = "https://api.shutterstock.com";

/// Per-attempt timeout
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Asset variants in order of preference
const ASSET_PRIORITY: [&str; 6] = [
    "preview_1500",
    "preview_1000",
    "huge_thumb",
    "preview",
    "large_thumb",
    "small_thumb",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchImage>,
}

#[derive(Debug, Deserialize)]
struct SearchImage {
    #[serde(default)]
    assets: HashMap<String, ImageAsset>,
}

#[derive(Debug, Deserialize)]
struct ImageAsset {
    url: Option<String>,
}

impl SearchImage {
    fn best_url(&self) -> Option<String> {
        ASSET_PRIORITY.iter().find_map(|variant| {
            self.assets
                .get(*variant)
                .and_then(|asset| asset.url.clone())
                .filter(|url| !url.is_empty())
        })
    }
}

/// One-shot Shutterstock search; retries and fallbacks live in the service
#[derive(Debug)]
pub struct ShutterstockClient {
    client: Arc<dyn HttpClientTrait>,
    api_key: String,
    api_secret: String,
    base_url: String,
    timeout: Duration,
}

impl ShutterstockClient {
    pub fn new(
        client: Arc<dyn HttpClientTrait>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: SHUTTERSTOCK_API_BASE_URL.to_string(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }

    fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.api_key, self.api_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    fn search_url(&self) -> String {
        format!("{}/v2/images/search", self.base_url)
    }
}

#[async_trait]
impl ImageProvider for ShutterstockClient {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<String>, DomainError> {
        if !self.is_configured() {
            return Err(DomainError::configuration(
                "Shutterstock API key and secret are not configured",
            ));
        }

        let request = HttpRequest::get(self.search_url())
            .service("shutterstock")
            .header("Authorization", self.authorization())
            .query("query", query)
            .query("per_page", count.to_string())
            .query("sort", "popular")
            .query("orientation", "horizontal")
            .query("image_type", "photo")
            .timeout(self.timeout);

        let response = self.client.send(request).await?;

        if response.status == 429 {
            return Err(DomainError::rate_limited("Shutterstock rate limit reached"));
        }

        if !response.is_success() {
            return Err(DomainError::upstream(
                "shutterstock",
                format!("HTTP {}: {}", response.status, response.body_excerpt()),
            ));
        }

        let parsed: SearchResponse = response.json().map_err(|e| {
            DomainError::upstream("shutterstock", format!("Failed to parse response: {}", e))
        })?;

        let urls: Vec<String> = parsed
            .data
            .iter()
            .filter_map(SearchImage::best_url)
            .take(count)
            .collect();

        debug!(query = %query, found = urls.len(), "Shutterstock search finished");

        Ok(urls)
    }

    fn provider_name(&self) -> &'static str {
        "shutterstock"
    }
}
