//! Timestamped cache entries

use chrono::{DateTime, Duration, Utc};

/// A cached payload with the time it was stored and how long it stays fresh
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub stored_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, stored_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            payload,
            stored_at,
            ttl,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.stored_at
    }

    /// Fresh while `now - stored_at < ttl`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.age(now) < self.ttl
    }

    /// The payload when fresh, `None` otherwise
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&T> {
        self.is_fresh(now).then_some(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_freshness_boundary() {
        let stored_at = Utc::now();
        let entry = CacheEntry::new("payload", stored_at, Duration::minutes(5));

        assert!(entry.is_fresh(stored_at));
        assert!(entry.is_fresh(stored_at + Duration::seconds(299)));
        assert!(!entry.is_fresh(stored_at + Duration::minutes(5)));
        assert_eq!(entry.fresh(stored_at + Duration::minutes(6)), None);
        assert_eq!(entry.fresh(stored_at), Some(&"payload"));
    }
}
