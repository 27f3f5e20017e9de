//! Stock image search: Shutterstock client, per-caller limiter and the
//! caching, retrying service in front of them

mod rate_limiter;
mod service;
mod shutterstock;

pub use rate_limiter::{RateLimitResult, RateLimiter, DEFAULT_REQUESTS_PER_WINDOW, DEFAULT_WINDOW_SECS};
pub use service::{
    ImageSearchService, RetryPolicy, DEFAULT_IMAGE_CACHE_MAX_ENTRIES, DEFAULT_IMAGE_CACHE_TTL_SECS,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY,
};
pub use shutterstock::{ShutterstockClient, DEFAULT_SEARCH_TIMEOUT, SHUTTERSTOCK_API_BASE_URL};
