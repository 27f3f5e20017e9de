//! Direct sheet passthrough and contact form submission

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::api::middleware::ClientAddr;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::sheet::{fetch_sheet_filtered, names};
use crate::domain::{first_success, ContactForm, Record};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetQuery {
    pub sheet: Option<String>,
    pub state_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SpreadsheetResponse {
    pub success: bool,
    pub data: Vec<Record>,
    /// Sheet the data came from
    pub sheet: String,
    /// Sheet that was asked for
    pub requested: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
}

/// Requested sheet first, then the known content sheets, without repeats
pub fn sheet_candidates(requested: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for sheet in [requested, names::LOCATIONS, names::CITIES, names::DEFAULT_TAB] {
        if !candidates.iter().any(|c| c == sheet) {
            candidates.push(sheet.to_string());
        }
    }

    candidates
}

/// GET /api/spreadsheet
pub async fn get_spreadsheet(
    State(state): State<AppState>,
    Query(query): Query<SpreadsheetQuery>,
) -> Result<Json<SpreadsheetResponse>, ApiError> {
    let requested = query
        .sheet
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(names::LOCATIONS)
        .to_string();
    let state_name = query.state_name.as_deref();

    debug!(requested = %requested, state_name = ?state_name, "Reading spreadsheet");

    let store = state.sheets.as_ref();
    let (sheet, data) = first_success(sheet_candidates(&requested), |sheet: String| async move {
        fetch_sheet_filtered(store, &sheet, state_name).await
    })
    .await
    .map_err(|exhausted| {
        error!(requested = %requested, error = %exhausted, "Every candidate sheet failed");
        ApiError::internal("Failed to fetch spreadsheet data").with_fallback()
    })?;

    Ok(Json(SpreadsheetResponse {
        success: true,
        data,
        sheet,
        requested,
    }))
}

/// POST /api/spreadsheet
pub async fn submit_contact(
    State(state): State<AppState>,
    client: ClientAddr,
    Json(form): Json<ContactForm>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let remote_ip = client.is_known().then(|| client.as_str());

    state.submissions.submit(&form, remote_ip).await?;

    Ok(Json(SubmitResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_candidates_deduplicate() {
        assert_eq!(
            sheet_candidates("Locations"),
            vec!["Locations", "Cities", "Sheet1"]
        );
        assert_eq!(
            sheet_candidates("PracticeAreas"),
            vec!["PracticeAreas", "Locations", "Cities", "Sheet1"]
        );
    }
}
