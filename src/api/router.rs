use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::health;
use super::middleware::logging_middleware;
use super::site;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Page-facing API
        .nest("/api", site::create_site_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::middleware::logging::REQUEST_ID_HEADER;
    use crate::domain::location::mock::MockLocationSource;
    use crate::domain::sheet::MockSheetStore;
    use crate::domain::{
        AppendAck, DomainError, Location, LocationEnvironment, ManualClock, Record,
    };
    use crate::infrastructure::http::mock::MockHttpClient;
    use crate::infrastructure::images::{ImageSearchService, RateLimiter, ShutterstockClient};
    use crate::infrastructure::location::LocationCache;
    use crate::infrastructure::submission::SubmissionService;

    fn cities_sheet() -> Vec<Record> {
        vec![
            Record::new()
                .with("City", "Los Angeles")
                .with("State", "CA")
                .with("State Name", "California")
                .with("Slug", "los-angeles"),
            Record::new()
                .with("City", "Austin")
                .with("State", "TX")
                .with("State Name", "Texas"),
        ]
    }

    fn los_angeles() -> Location {
        Location {
            city: "Los Angeles".to_string(),
            state: "CA".to_string(),
            state_name: "California".to_string(),
            courthouse: "Stanley Mosk Courthouse".to_string(),
            slug: "los-angeles".to_string(),
            ..Default::default()
        }
    }

    fn app(store: MockSheetStore) -> Router {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(store);

        let locations = Arc::new(LocationCache::new(
            Arc::new(MockLocationSource::new().with_locations(vec![los_angeles()])),
            clock.clone(),
            LocationEnvironment::Runtime,
        ));
        // No credentials, so every search ends in placeholders
        let images = Arc::new(ImageSearchService::new(
            Arc::new(ShutterstockClient::new(Arc::new(MockHttpClient::new()), "", "")),
            RateLimiter::per_minute_default(clock.clone()),
            clock.clone(),
        ));
        let submissions = Arc::new(SubmissionService::new(store.clone(), None, clock));

        create_router_with_state(AppState::new(store, locations, images, submissions))
    }

    fn reading_store() -> MockSheetStore {
        let mut store = MockSheetStore::new();
        store.expect_fetch_sheet().returning(|sheet: &str| match sheet {
            "Cities" => Ok(cities_sheet()),
            other => Err(DomainError::not_found(format!("no sheet {}", other))),
        });
        store
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .header("x-forwarded-for", "203.0.113.7")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    fn contact(email: &str) -> serde_json::Value {
        serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "phone": "555-0100",
            "message": "I was rear-ended on the freeway."
        })
    }

    #[tokio::test]
    async fn test_health_and_request_id() {
        let response = app(MockSheetStore::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_ready_reports_location_cache() {
        let (status, body) = get(app(MockSheetStore::new()), "/ready").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["locations"]["populated"], false);
        assert_eq!(body["checks"][0]["name"], "sheets");
    }

    #[tokio::test]
    async fn test_list_cities_filtered_by_state() {
        let (status, body) = get(app(reading_store()), "/api/cities?state=texas").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["name"], "Austin");
    }

    #[tokio::test]
    async fn test_list_cities_degrades_on_read_failure() {
        let mut store = MockSheetStore::new();
        store
            .expect_fetch_sheet()
            .returning(|sheet: &str| Err(DomainError::sheet_fetch(sheet, "503")));

        let (status, body) = get(app(store), "/api/cities").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], serde_json::json!([]));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_city_page_and_missing_city() {
        let (status, body) = get(app(reading_store()), "/api/cities/Los-Angeles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"]["name"], "Los Angeles");

        let (status, body) = get(app(reading_store()), "/api/cities/atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "City 'atlantis' not found");
    }

    #[tokio::test]
    async fn test_spreadsheet_falls_back_to_next_sheet() {
        let (status, body) = get(app(reading_store()), "/api/spreadsheet?stateName=California").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["requested"], "Locations");
        assert_eq!(body["sheet"], "Cities");
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_spreadsheet_reports_fallback_when_every_sheet_fails() {
        let mut store = MockSheetStore::new();
        store
            .expect_fetch_sheet()
            .times(3)
            .returning(|sheet: &str| Err(DomainError::sheet_fetch(sheet, "503")));

        let (status, body) = get(app(store), "/api/spreadsheet").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["fallback"], true);
    }

    #[tokio::test]
    async fn test_submit_contact_appends_row() {
        let mut store = MockSheetStore::new();
        store
            .expect_append_rows()
            .withf(|sheet: &str, rows: &Vec<Vec<String>>| sheet == "Submissions" && rows.len() == 1)
            .times(1)
            .returning(|_, _| {
                Ok(AppendAck {
                    updated_range: Some("Submissions!A2:G2".to_string()),
                    updated_rows: 1,
                })
            });

        let (status, body) = post_json(app(store), "/api/spreadsheet", contact("ada@example.com")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_submit_contact_rejects_malformed_email() {
        let mut store = MockSheetStore::new();
        store.expect_append_rows().times(0);

        let (status, body) = post_json(app(store), "/api/spreadsheet", contact("not-an-email")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_shutterstock_falls_back_to_placeholders() {
        let (status, body) = get(app(MockSheetStore::new()), "/api/shutterstock?query=courthouse&count=3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], true);
        assert_eq!(body["images"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_shutterstock_rate_limits_caller() {
        let app = app(MockSheetStore::new());

        for _ in 0..5 {
            let (_, body) = get(app.clone(), "/api/shutterstock?query=court").await;
            assert!(body.get("rateLimited").is_none());
        }

        let (status, body) = get(app, "/api/shutterstock?query=court").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rateLimited"], true);
    }

    #[tokio::test]
    async fn test_locations_endpoints() {
        let (status, body) = get(app(MockSheetStore::new()), "/api/locations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["slug"], "los-angeles");

        let (status, body) = get(app(MockSheetStore::new()), "/api/locations/Los-Angeles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["courthouse"], "Stanley Mosk Courthouse");

        let (status, _) = get(app(MockSheetStore::new()), "/api/locations/atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_encoded_slugs_are_decoded_before_lookup() {
        let (status, body) = get(app(MockSheetStore::new()), "/api/locations/Los%20Angeles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "los-angeles");

        let (status, body) = get(app(reading_store()), "/api/cities/Los%20Angeles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"]["slug"], "los-angeles");

        let (status, body) = get(app(MockSheetStore::new()), "/api/locations/prairie-ridge").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Prairie Ridge");
    }
}
