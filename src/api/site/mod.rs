//! Page-facing site API endpoints

pub mod cities;
pub mod locations;
pub mod shutterstock;
pub mod spreadsheet;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create site API router
pub fn create_site_router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(cities::list_cities))
        .route("/cities/{city_slug}", get(cities::get_city))
        .route(
            "/spreadsheet",
            get(spreadsheet::get_spreadsheet).post(spreadsheet::submit_contact),
        )
        .route("/shutterstock", get(shutterstock::search_images))
        .route("/locations", get(locations::list_locations))
        .route("/locations/{slug}", get(locations::get_location))
}
