//! Image search with rate limiting, caching, retries and placeholders

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::RateLimiter;
use crate::domain::image::{clamp_count, placeholder_images};
use crate::domain::{Clock, DomainError, ImageProvider, ImageSearchOutcome, ImageSource};
use crate::infrastructure::cache::TtlCache;

/// How long search results are reused
pub const DEFAULT_IMAGE_CACHE_TTL_SECS: i64 = 24 * 60 * 60;

/// Distinct `(query, count)` results kept at most
pub const DEFAULT_IMAGE_CACHE_MAX_ENTRIES: u64 = 1_000;

/// Retries after the first failed attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Retry policy for upstream searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Image search that never fails.
///
/// Order of evaluation: caller rate limit, result cache, upstream with
/// retries, deterministic placeholders.
#[derive(Debug)]
pub struct ImageSearchService {
    provider: Arc<dyn ImageProvider>,
    limiter: RateLimiter,
    cache: TtlCache<(String, usize), Vec<String>>,
    retry: RetryPolicy,
}

impl ImageSearchService {
    pub fn new(provider: Arc<dyn ImageProvider>, limiter: RateLimiter, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            limiter,
            cache: TtlCache::with_capacity(
                chrono::Duration::seconds(DEFAULT_IMAGE_CACHE_TTL_SECS),
                DEFAULT_IMAGE_CACHE_MAX_ENTRIES,
                clock,
            ),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(
        mut self,
        ttl: chrono::Duration,
        max_entries: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        self.cache = TtlCache::with_capacity(ttl, max_entries, clock);
        self
    }

    /// Up to `count` image URLs for `query` on behalf of `caller`
    pub async fn search(&self, caller: &str, query: &str, count: usize) -> ImageSearchOutcome {
        let count = clamp_count(count);
        let query = query.trim();

        let limit = self.limiter.check_and_record(caller).await;
        if !limit.allowed {
            info!(
                caller = %caller,
                reset_in_seconds = limit.reset_in_seconds,
                "Image search rate limited"
            );
            return ImageSearchOutcome::new(placeholder_images(query, count), ImageSource::RateLimited);
        }

        let key = (query.to_string(), count);
        if let Some(images) = self.cache.get_fresh(&key).await {
            debug!(query = %query, count, "Image cache hit");
            return ImageSearchOutcome::new(images, ImageSource::Cached);
        }

        match self.search_with_retries(query, count).await {
            Ok(images) if !images.is_empty() => {
                self.cache.insert(key, images.clone()).await;
                ImageSearchOutcome::new(images, ImageSource::Live)
            }
            Ok(_) => {
                info!(query = %query, "No images found, using placeholders");
                ImageSearchOutcome::new(placeholder_images(query, count), ImageSource::Fallback)
            }
            Err(e) => {
                warn!(
                    provider = self.provider.provider_name(),
                    query = %query,
                    error = %e,
                    "Image search failed, using placeholders"
                );
                ImageSearchOutcome::new(placeholder_images(query, count), ImageSource::Fallback)
            }
        }
    }

    /// Retries transient failures; rate limiting and configuration errors
    /// end the search at once
    async fn search_with_retries(&self, query: &str, count: usize) -> Result<Vec<String>, DomainError> {
        let mut attempt = 0;

        loop {
            match self.provider.search(query, count).await {
                Ok(images) => return Ok(images),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(
                        provider = self.provider.provider_name(),
                        attempt,
                        max_retries = self.retry.max_retries,
                        error = %e,
                        "Image search attempt failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
