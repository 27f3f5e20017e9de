//! Location cache and the sources behind it

mod cache;
mod http_source;
mod sheet_source;

pub use cache::{LocationCache, LocationCacheStatus, DEFAULT_LOCATION_TTL_SECS};
pub use http_source::HttpLocationSource;
pub use sheet_source::SheetLocationSource;
