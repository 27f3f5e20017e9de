//! Location list and lookup handlers

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Location;

#[derive(Debug, Default, Deserialize)]
pub struct LocationsQuery {
    pub refresh: Option<String>,
    pub state: Option<String>,
}

impl LocationsQuery {
    pub fn force_refresh(&self) -> bool {
        matches!(
            self.refresh.as_deref().map(str::trim),
            Some("1") | Some("true") | Some("yes")
        )
    }
}

#[derive(Debug, Serialize)]
pub struct LocationsResponse {
    pub data: Vec<Location>,
    pub count: usize,
}

/// GET /api/locations
pub async fn list_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationsQuery>,
) -> Json<LocationsResponse> {
    let locations = state.locations.get_all_locations(query.force_refresh()).await;

    let data: Vec<Location> = match query.state.as_deref().map(str::trim) {
        Some(wanted) if !wanted.is_empty() => locations
            .into_iter()
            .filter(|l| l.in_state(wanted))
            .collect(),
        _ => locations,
    };

    Json(LocationsResponse {
        count: data.len(),
        data,
    })
}

/// GET /api/locations/{slug}
pub async fn get_location(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Location>, ApiError> {
    state
        .locations
        .get_location_by_slug(&slug)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Location '{}' not found", slug)))
}
