use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use crate::domain::{AccessToken, AccessTokenProvider, DomainError};

/// Tokens live for an hour; refresh well before that
pub const DEFAULT_TOKEN_CACHE_TTL: Duration = Duration::from_secs(55 * 60);

/// Token provider wrapper that reuses a token until shortly before expiry.
///
/// Entries are keyed by the credential fingerprint so a key rotation never
/// serves a token minted for the old identity.
#[derive(Debug)]
pub struct CachedTokenProvider<P: AccessTokenProvider> {
    inner: P,
    fingerprint: String,
    cache: Cache<String, AccessToken>,
}

impl<P: AccessTokenProvider> CachedTokenProvider<P> {
    pub fn new(inner: P, fingerprint: impl Into<String>) -> Self {
        Self::with_ttl(inner, fingerprint, DEFAULT_TOKEN_CACHE_TTL)
    }

    pub fn with_ttl(inner: P, fingerprint: impl Into<String>, ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).max_capacity(8).build();

        Self {
            inner,
            fingerprint: fingerprint.into(),
            cache,
        }
    }

    /// Drop the cached token so the next call exchanges again
    pub async fn invalidate(&self) {
        self.cache.invalidate(&self.fingerprint).await;
    }
}

#[async_trait]
impl<P: AccessTokenProvider> AccessTokenProvider for CachedTokenProvider<P> {
    async fn access_token(&self) -> Result<AccessToken, DomainError> {
        if let Some(cached) = self.cache.get(&self.fingerprint).await {
            if !cached.is_expired_at(chrono::Utc::now()) {
                tracing::debug!(provider = self.inner.provider_name(), "Cache hit for access token");
                return Ok(cached);
            }

            self.cache.invalidate(&self.fingerprint).await;
        }

        tracing::debug!(
            provider = self.inner.provider_name(),
            "Cache miss, requesting access token"
        );

        let token = self.inner.access_token().await?;
        self.cache
            .insert(self.fingerprint.clone(), token.clone())
            .await;

        Ok(token)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::mock::StaticTokenProvider;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Shared(Arc<StaticTokenProvider>);

    #[async_trait]
    impl AccessTokenProvider for Shared {
        async fn access_token(&self) -> Result<AccessToken, DomainError> {
            self.0.access_token().await
        }

        fn provider_name(&self) -> &'static str {
            "shared"
        }
    }

    #[tokio::test]
    async fn test_reuses_token_within_ttl() {
        let inner = Arc::new(StaticTokenProvider::new("ya29.cached"));
        let cached = CachedTokenProvider::new(Shared(inner.clone()), "fp");

        let first = cached.access_token().await.unwrap();
        let second = cached.access_token().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_exchange() {
        let inner = Arc::new(StaticTokenProvider::new("ya29.cached"));
        let cached = CachedTokenProvider::new(Shared(inner.clone()), "fp");

        cached.access_token().await.unwrap();
        cached.invalidate().await;
        cached.access_token().await.unwrap();

        assert_eq!(inner.call_count(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let inner = Arc::new(StaticTokenProvider::failing(DomainError::auth("denied")));
        let cached = CachedTokenProvider::new(Shared(inner.clone()), "fp");

        assert!(cached.access_token().await.is_err());
        assert!(cached.access_token().await.is_err());
        assert_eq!(inner.call_count(), 2);
    }
}
