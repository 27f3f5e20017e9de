//! Firm Content API
//!
//! Content back end for a law firm website:
//! - Spreadsheet-backed cities, states, keypoints and practice areas
//! - Location pages with a TTL cache and a built-in fallback
//! - Stock image search with retries, caching and per-caller rate limiting
//! - Contact form submissions appended to the spreadsheet

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{AccessTokenProvider, Clock, LocationSource, SheetStore, SystemClock};
use infrastructure::{
    captcha::{CaptchaVerifier, RecaptchaVerifier},
    google::{CachedTokenProvider, GoogleSheetsClient, ServiceAccountTokenProvider},
    http::{HttpClient, HttpClientTrait},
    images::{
        ImageSearchService, RateLimiter, RetryPolicy, ShutterstockClient, DEFAULT_WINDOW_SECS,
    },
    location::{HttpLocationSource, LocationCache, SheetLocationSource},
    submission::SubmissionService,
};
use tracing::{info, warn};

/// Build the sheet store the rest of the application reads through
pub fn create_sheet_store(
    config: &AppConfig,
    http: Arc<dyn HttpClientTrait>,
    clock: Arc<dyn Clock>,
) -> Arc<dyn SheetStore> {
    let credentials = config.sheets.credentials();
    let fingerprint = credentials.fingerprint();

    let provider = ServiceAccountTokenProvider::with_token_url(
        http.clone(),
        credentials,
        clock,
        config.sheets.token_url.clone(),
    );

    let tokens: Arc<dyn AccessTokenProvider> = if config.sheets.cache_tokens {
        Arc::new(CachedTokenProvider::new(provider, fingerprint))
    } else {
        Arc::new(provider)
    };

    Arc::new(GoogleSheetsClient::with_base_url(
        http,
        tokens,
        config.sheets.spreadsheet_id.clone(),
        config.sheets.api_base_url.clone(),
    ))
}

/// Create the application state with every service wired from configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let http: Arc<dyn HttpClientTrait> = Arc::new(HttpClient::with_timeout(
        Duration::from_secs(config.server.http_timeout_secs),
    )?);

    let missing = config.missing_settings();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Running with incomplete configuration; fallback content will be served");
    }

    let sheets = create_sheet_store(config, http.clone(), clock.clone());

    let location_source: Arc<dyn LocationSource> = match config.locations.endpoint.as_deref() {
        Some(endpoint) if !endpoint.trim().is_empty() => {
            info!(endpoint = %endpoint, "Loading locations from HTTP endpoint");
            Arc::new(HttpLocationSource::new(http.clone(), endpoint.trim()))
        }
        _ => Arc::new(SheetLocationSource::new(sheets.clone())),
    };

    let locations = Arc::new(LocationCache::with_ttl(
        location_source,
        clock.clone(),
        config.locations.environment,
        chrono::Duration::seconds(config.locations.ttl_secs),
    ));

    let shutterstock = ShutterstockClient::new(
        http.clone(),
        config.images.api_key.clone(),
        config.images.api_secret.clone(),
    )
    .with_base_url(config.images.base_url.clone())
    .with_timeout(Duration::from_secs(config.images.timeout_secs));

    let images = Arc::new(
        ImageSearchService::new(
            Arc::new(shutterstock),
            RateLimiter::new(
                config.images.rate_limit_per_minute,
                chrono::Duration::seconds(DEFAULT_WINDOW_SECS),
                clock.clone(),
            ),
            clock.clone(),
        )
        .with_retry_policy(RetryPolicy {
            max_retries: config.images.max_retries,
            delay: Duration::from_millis(config.images.retry_delay_ms),
        })
        .with_cache(
            chrono::Duration::seconds(config.images.cache_ttl_secs),
            config.images.cache_max_entries,
            clock.clone(),
        ),
    );

    let captcha: Option<Arc<dyn CaptchaVerifier>> = config.captcha.active_secret().map(|secret| {
        Arc::new(RecaptchaVerifier::with_verify_url(
            http.clone(),
            secret,
            config.captcha.verify_url.clone(),
        )) as Arc<dyn CaptchaVerifier>
    });
    if captcha.is_none() {
        info!("No CAPTCHA secret configured; contact submissions are not verified");
    }

    let submissions = Arc::new(SubmissionService::new(sheets.clone(), captcha, clock));

    Ok(AppState::new(sheets, locations, images, submissions)
        .with_sheets_configured(config.sheets.is_configured()))
}
