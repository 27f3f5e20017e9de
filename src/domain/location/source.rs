use async_trait::async_trait;
use std::fmt::Debug;

use super::Location;
use crate::domain::DomainError;

/// Where the location cache loads its data from
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Loads every location. An empty result is a valid answer here; the
    /// cache decides how to treat it.
    async fn fetch_locations(&self) -> Result<Vec<Location>, DomainError>;

    /// Source name for logging
    fn source_name(&self) -> &'static str;
}
