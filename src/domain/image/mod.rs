//! Stock image search domain

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::domain::slug::slugify;
use crate::domain::DomainError;

/// Largest number of images a single search may request
pub const MAX_IMAGE_COUNT: usize = 10;

/// Seed used for placeholders when the query has no usable characters
const PLACEHOLDER_DEFAULT_SEED: &str = "law-office";

/// A single upstream image search
#[async_trait]
pub trait ImageProvider: Send + Sync + Debug {
    /// Returns up to `count` image URLs for `query`. One attempt, no retries.
    async fn search(&self, query: &str, count: usize) -> Result<Vec<String>, DomainError>;

    fn provider_name(&self) -> &'static str;
}

/// Where the returned images came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Live,
    Cached,
    RateLimited,
    Fallback,
}

/// Result of an image search; never an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSearchOutcome {
    pub images: Vec<String>,
    pub source: ImageSource,
}

impl ImageSearchOutcome {
    pub fn new(images: Vec<String>, source: ImageSource) -> Self {
        Self { images, source }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, ImageSource::RateLimited | ImageSource::Fallback)
    }
}

/// Clamps a requested count into `1..=MAX_IMAGE_COUNT`
pub fn clamp_count(count: usize) -> usize {
    count.clamp(1, MAX_IMAGE_COUNT)
}

/// Deterministic placeholder URLs for a query
pub fn placeholder_images(query: &str, count: usize) -> Vec<String> {
    let seed = match slugify(query) {
        s if s.is_empty() => PLACEHOLDER_DEFAULT_SEED.to_string(),
        s => s,
    };

    (1..=clamp_count(count))
        .map(|i| format!("https://picsum.photos/seed/{}-{}/1200/800", seed, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(0), 1);
        assert_eq!(clamp_count(3), 3);
        assert_eq!(clamp_count(50), MAX_IMAGE_COUNT);
    }

    #[test]
    fn test_placeholders_are_deterministic() {
        let first = placeholder_images("Car Accident Lawyer", 2);
        let second = placeholder_images("Car Accident Lawyer", 2);

        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                "https://picsum.photos/seed/car-accident-lawyer-1/1200/800",
                "https://picsum.photos/seed/car-accident-lawyer-2/1200/800",
            ]
        );
    }

    #[test]
    fn test_placeholder_seed_for_symbol_query() {
        let images = placeholder_images("???", 1);
        assert_eq!(images, vec!["https://picsum.photos/seed/law-office-1/1200/800"]);
    }

    #[test]
    fn test_placeholder_outcome_flags() {
        assert!(ImageSearchOutcome::new(vec![], ImageSource::RateLimited).is_placeholder());
        assert!(!ImageSearchOutcome::new(vec![], ImageSource::Cached).is_placeholder());
    }
}
