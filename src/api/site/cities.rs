//! City listing and city page handlers

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::City;
use crate::infrastructure::content::CityPage;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiesQuery {
    pub state: Option<String>,
    pub state_slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub data: Vec<City>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/cities
///
/// Never fails: read errors come back as an empty list with a message.
pub async fn list_cities(
    State(state): State<AppState>,
    Query(query): Query<CitiesQuery>,
) -> Json<CitiesResponse> {
    debug!(state = ?query.state, state_slug = ?query.state_slug, "Listing cities");

    match state
        .content
        .cities(query.state.as_deref(), query.state_slug.as_deref())
        .await
    {
        Ok(cities) if cities.is_empty() => Json(CitiesResponse {
            data: cities,
            message: Some("No cities found".to_string()),
            error: None,
        }),
        Ok(cities) => Json(CitiesResponse {
            data: cities,
            message: None,
            error: None,
        }),
        Err(e) => {
            warn!(error = %e, "Failed to load cities");
            Json(CitiesResponse {
                data: Vec::new(),
                message: Some("City data is temporarily unavailable".to_string()),
                error: Some(e.to_string()),
            })
        }
    }
}

/// GET /api/cities/{citySlug}
pub async fn get_city(
    State(state): State<AppState>,
    Path(city_slug): Path<String>,
) -> Result<Json<CityPage>, ApiError> {
    debug!(city_slug = %city_slug, "Getting city page");

    let page = state.content.city_page(&city_slug).await.map_err(|e| {
        error!(city_slug = %city_slug, error = %e, "Failed to load city data");
        ApiError::internal("Failed to load city data")
    })?;

    page.map(Json)
        .ok_or_else(|| ApiError::not_found(format!("City '{}' not found", city_slug)))
}
