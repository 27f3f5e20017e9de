//! Cache domain - timestamped entries evaluated against an injected clock

mod entry;

pub use entry::CacheEntry;
