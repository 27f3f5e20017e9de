//! Cache infrastructure - In-process cache implementations

mod ttl_cache;

pub use ttl_cache::{TtlCache, DEFAULT_MAX_ENTRIES};
