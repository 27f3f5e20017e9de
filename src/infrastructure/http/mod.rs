//! Outbound HTTP plumbing shared by every integration

mod client;

pub use client::{HttpClient, HttpClientTrait, HttpMethod, HttpRequest, HttpResponse, RequestBody};

#[cfg(test)]
pub use client::mock;
