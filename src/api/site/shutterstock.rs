//! Stock image search handler

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::api::middleware::ClientAddr;
use crate::api::state::AppState;
use crate::api::types::Json;
use crate::domain::{ImageSearchOutcome, ImageSource};

#[derive(Debug, Default, Deserialize)]
pub struct ShutterstockQuery {
    pub query: Option<String>,
    /// Kept as text so that junk values fall back to the default
    pub count: Option<String>,
}

impl ShutterstockQuery {
    pub fn count(&self) -> usize {
        self.count
            .as_deref()
            .and_then(|c| c.trim().parse::<usize>().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShutterstockResponse {
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl From<ImageSearchOutcome> for ShutterstockResponse {
    fn from(outcome: ImageSearchOutcome) -> Self {
        let (rate_limited, error) = match outcome.source {
            ImageSource::RateLimited => (Some(true), None),
            ImageSource::Fallback => (None, Some(true)),
            ImageSource::Live | ImageSource::Cached => (None, None),
        };

        Self {
            images: outcome.images,
            rate_limited,
            error,
        }
    }
}

/// GET /api/shutterstock
///
/// Always 200; failures are signalled by flags next to placeholder images.
pub async fn search_images(
    State(state): State<AppState>,
    client: ClientAddr,
    Query(query): Query<ShutterstockQuery>,
) -> Json<ShutterstockResponse> {
    let count = query.count();
    let text = query.query.as_deref().unwrap_or_default();

    let outcome = state.images.search(client.as_str(), text, count).await;

    Json(outcome.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_defaults_to_one() {
        let missing = ShutterstockQuery::default();
        let junk = ShutterstockQuery {
            query: None,
            count: Some("lots".to_string()),
        };
        let given = ShutterstockQuery {
            query: None,
            count: Some("4".to_string()),
        };

        assert_eq!(missing.count(), 1);
        assert_eq!(junk.count(), 1);
        assert_eq!(given.count(), 4);
    }

    #[test]
    fn test_response_flags() {
        let limited: ShutterstockResponse =
            ImageSearchOutcome::new(vec![], ImageSource::RateLimited).into();
        let fallback: ShutterstockResponse =
            ImageSearchOutcome::new(vec![], ImageSource::Fallback).into();
        let live: ShutterstockResponse =
            ImageSearchOutcome::new(vec!["a".to_string()], ImageSource::Live).into();

        assert_eq!(
            serde_json::to_value(limited).unwrap(),
            serde_json::json!({"images": [], "rateLimited": true})
        );
        assert_eq!(
            serde_json::to_value(fallback).unwrap(),
            serde_json::json!({"images": [], "error": true})
        );
        assert_eq!(
            serde_json::to_value(live).unwrap(),
            serde_json::json!({"images": ["a"]})
        );
    }
}
