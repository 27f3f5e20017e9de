use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::DomainError;

/// HTTP verbs used by the outbound integrations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// Outbound request description
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub timeout: Option<Duration>,
    /// Label used in errors and logs
    pub service: String,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
            service: "http".to_string(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// First header value with the given name, ignoring case
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First form field value with the given name
    pub fn form_value(&self, name: &str) -> Option<&str> {
        match &self.body {
            Some(RequestBody::Form(fields)) => fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Body cut down for log and error messages
    pub fn body_excerpt(&self) -> String {
        const MAX_ERROR_BODY_LENGTH: usize = 300;

        if self.body.len() <= MAX_ERROR_BODY_LENGTH {
            return self.body.clone();
        }

        let mut end = MAX_ERROR_BODY_LENGTH;
        while !self.body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &self.body[..end])
    }
}

/// Trait for HTTP client operations (for mocking)
///
/// Non-2xx statuses are returned as responses; only transport failures are
/// errors (`UpstreamTimeout` for timeouts, `Upstream` otherwise).
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Client with a default timeout applied to every request
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DomainError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::upstream_timeout(request.service.clone())
            } else {
                DomainError::upstream(request.service.clone(), format!("Request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::upstream_timeout(request.service.clone())
            } else {
                DomainError::upstream(
                    request.service.clone(),
                    format!("Failed to read response body: {}", e),
                )
            }
        })?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// One scripted reply
    #[derive(Debug, Clone)]
    pub enum MockReply {
        Response(HttpResponse),
        Error(DomainError),
    }

    /// URL-keyed scripted client that records every request
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        defaults: RwLock<HashMap<String, MockReply>>,
        sequences: RwLock<HashMap<String, Vec<MockReply>>>,
        requests: RwLock<Vec<HttpRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every request to `url` gets this JSON response
        pub fn with_response(
            self,
            url: impl Into<String>,
            status: u16,
            body: serde_json::Value,
        ) -> Self {
            self.defaults.write().unwrap().insert(
                url.into(),
                MockReply::Response(HttpResponse::new(status, body.to_string())),
            );
            self
        }

        /// Every request to `url` fails with this error
        pub fn with_error(self, url: impl Into<String>, error: DomainError) -> Self {
            self.defaults
                .write()
                .unwrap()
                .insert(url.into(), MockReply::Error(error));
            self
        }

        /// Replies consumed in order before falling back to the default
        pub fn with_sequence(self, url: impl Into<String>, replies: Vec<MockReply>) -> Self {
            self.sequences.write().unwrap().insert(url.into(), replies);
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.read().unwrap().clone()
        }

        pub fn call_count(&self, url: &str) -> usize {
            self.requests
                .read()
                .unwrap()
                .iter()
                .filter(|r| r.url == url)
                .count()
        }
    }

    #[async_trait]
    impl HttpClientTrait for MockHttpClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, DomainError> {
            let url = request.url.clone();
            self.requests.write().unwrap().push(request);

            let queued = {
                let mut sequences = self.sequences.write().unwrap();
                sequences
                    .get_mut(&url)
                    .filter(|replies| !replies.is_empty())
                    .map(|replies| replies.remove(0))
            };

            let reply = queued.or_else(|| self.defaults.read().unwrap().get(&url).cloned());

            match reply {
                Some(MockReply::Response(response)) => Ok(response),
                Some(MockReply::Error(error)) => Err(error),
                None => Err(DomainError::upstream(
                    "mock",
                    format!("No mock response for {}", url),
                )),
            }
        }
    }
}
