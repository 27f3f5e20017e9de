use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DomainError, Location, LocationSource, Record};
use crate::infrastructure::http::{HttpClientTrait, HttpRequest};

/// Per-request timeout for the locations endpoint
const LOCATIONS_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads locations from a JSON endpoint.
///
/// Accepts a bare array of objects or an envelope `{ "data": [...] }`.
#[derive(Debug)]
pub struct HttpLocationSource {
    client: Arc<dyn HttpClientTrait>,
    endpoint: String,
}

impl HttpLocationSource {
    pub fn new(client: Arc<dyn HttpClientTrait>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

fn extract_items(body: serde_json::Value) -> Option<Vec<serde_json::Value>> {
    match body {
        serde_json::Value::Array(items) => Some(items),
        serde_json::Value::Object(mut object) => match object.remove("data") {
            Some(serde_json::Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

#[async_trait]
impl LocationSource for HttpLocationSource {
    async fn fetch_locations(&self) -> Result<Vec<Location>, DomainError> {
        let request = HttpRequest::get(&self.endpoint)
            .service("locations")
            .header("Accept", "application/json")
            .timeout(LOCATIONS_TIMEOUT);

        let response = self.client.send(request).await?;

        if !response.is_success() {
            return Err(DomainError::upstream(
                "locations",
                format!("HTTP {}: {}", response.status, response.body_excerpt()),
            ));
        }

        let body: serde_json::Value = response.json().map_err(|e| {
            DomainError::upstream("locations", format!("Invalid JSON: {}", e))
        })?;

        let items = extract_items(body).ok_or_else(|| {
            DomainError::upstream("locations", "Expected an array or a { data: [...] } object")
        })?;

        Ok(items
            .iter()
            .filter_map(Record::from_json)
            .map(|record| Location::from_record(&record))
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
