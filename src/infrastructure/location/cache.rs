//! Time-boxed location cache with stale and hardcoded fallbacks

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::slug::normalize_slug;
use crate::domain::{CacheEntry, Clock, Location, LocationEnvironment, LocationSource};

/// How long a fetched location list is served without refetching
pub const DEFAULT_LOCATION_TTL_SECS: i64 = 300;

/// Point-in-time view of the cache, for readiness reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCacheStatus {
    pub environment: LocationEnvironment,
    pub source: &'static str,
    pub populated: bool,
    pub fresh: bool,
    pub count: usize,
    pub age_secs: Option<i64>,
}

/// Application-owned cache in front of a [`LocationSource`].
///
/// Reads never fail: a failed or empty refresh serves the previous payload,
/// even when expired, and with nothing cached the single fallback location.
/// Concurrent refreshes may both hit the source; the last write wins.
#[derive(Debug)]
pub struct LocationCache {
    source: Arc<dyn LocationSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    environment: LocationEnvironment,
    entry: RwLock<Option<CacheEntry<Vec<Location>>>>,
}

impl LocationCache {
    pub fn new(
        source: Arc<dyn LocationSource>,
        clock: Arc<dyn Clock>,
        environment: LocationEnvironment,
    ) -> Self {
        Self::with_ttl(
            source,
            clock,
            environment,
            Duration::seconds(DEFAULT_LOCATION_TTL_SECS),
        )
    }

    pub fn with_ttl(
        source: Arc<dyn LocationSource>,
        clock: Arc<dyn Clock>,
        environment: LocationEnvironment,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            ttl,
            environment,
            entry: RwLock::new(None),
        }
    }

    pub fn environment(&self) -> LocationEnvironment {
        self.environment
    }

    /// Every known location.
    ///
    /// Serves the cached list while fresh unless `force_refresh` is set.
    pub async fn get_all_locations(&self, force_refresh: bool) -> Vec<Location> {
        if self.environment == LocationEnvironment::Build {
            debug!("Build environment, serving fallback location without fetching");
            return vec![Location::fallback()];
        }

        if !force_refresh {
            let now = self.clock.now();
            let entry = self.entry.read().await;

            if let Some(locations) = entry.as_ref().and_then(|e| e.fresh(now)) {
                debug!(count = locations.len(), "Location cache hit");
                return locations.clone();
            }
        }

        match self.source.fetch_locations().await {
            Ok(locations) => {
                let usable: Vec<Location> =
                    locations.into_iter().filter(Location::is_usable).collect();

                if !usable.is_empty() {
                    let stored_at = self.clock.now();
                    *self.entry.write().await =
                        Some(CacheEntry::new(usable.clone(), stored_at, self.ttl));

                    info!(
                        source = self.source.source_name(),
                        count = usable.len(),
                        "Refreshed location cache"
                    );
                    return usable;
                }

                warn!(
                    source = self.source.source_name(),
                    "Location source returned no usable locations"
                );
            }
            Err(e) => {
                warn!(
                    source = self.source.source_name(),
                    error = %e,
                    "Failed to fetch locations"
                );
            }
        }

        self.last_resort().await
    }

    /// Previous payload regardless of age, else the fallback location
    async fn last_resort(&self) -> Vec<Location> {
        let entry = self.entry.read().await;

        match entry.as_ref() {
            Some(stale) => {
                warn!(
                    age_secs = stale.age(self.clock.now()).num_seconds(),
                    "Serving stale locations"
                );
                stale.payload.clone()
            }
            None => {
                warn!("No cached locations, serving fallback location");
                vec![Location::fallback()]
            }
        }
    }

    /// Location whose slug equals the normalized `slug`.
    ///
    /// The fallback location always resolves by its own slug, even when the
    /// live list does not contain it. Other unknown slugs give `None`.
    /// Expects an already percent-decoded slug.
    pub async fn get_location_by_slug(&self, slug: &str) -> Option<Location> {
        let slug = normalize_slug(slug);
        if slug.is_empty() {
            return None;
        }

        if self.environment == LocationEnvironment::Build {
            let fallback = Location::fallback();
            return Some(if fallback.slug == slug {
                fallback
            } else {
                Location::synthetic(&slug)
            });
        }

        let found = self
            .get_all_locations(false)
            .await
            .into_iter()
            .find(|location| location.slug == slug);

        found.or_else(|| {
            let fallback = Location::fallback();
            (fallback.slug == slug).then_some(fallback)
        })
    }

    /// Locations in a state, by code or full name
    pub async fn locations_in_state(&self, state: &str) -> Vec<Location> {
        self.get_all_locations(false)
            .await
            .into_iter()
            .filter(|location| location.in_state(state))
            .collect()
    }

    /// Forget the cached payload; the next read fetches
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    pub async fn status(&self) -> LocationCacheStatus {
        let now = self.clock.now();
        let entry = self.entry.read().await;

        LocationCacheStatus {
            environment: self.environment,
            source: self.source.source_name(),
            populated: entry.is_some(),
            fresh: entry.as_ref().is_some_and(|e| e.is_fresh(now)),
            count: entry.as_ref().map(|e| e.payload.len()).unwrap_or(0),
            age_secs: entry.as_ref().map(|e| e.age(now).num_seconds()),
        }
    }
}
