//! # Cache/TTL Store
//!
//! Time-bounded caching of API responses. Every bucket holds
//! `{data, timestamp, ttl}` and is valid iff a timestamp is present and
//! `now - timestamp < ttl`.
//!
//! Time comes from [`tokio::time::Instant`], so tests drive expiry with the
//! paused tokio clock.
//!
//! ## Buckets and default TTLs
//!
//! | Key            | TTL    |
//! |----------------|--------|
//! | `summary`      | 5 min  |
//! | `charts`       | 15 min |
//! | `insights`     | 30 min |
//! | `transactions` | 1 min  |
//! | `accounts`     | 5 min  |
//! | `goals`        | 5 min  |

pub mod ttl;

pub use ttl::{EntryStatus, TtlEntry, TtlStore};

use std::fmt;
use std::time::Duration;

/// Resource bucket names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    Summary,
    Charts,
    Insights,
    Transactions,
    Accounts,
    Goals,
}

impl CacheKey {
    pub const ALL: [CacheKey; 6] = [
        CacheKey::Summary,
        CacheKey::Charts,
        CacheKey::Insights,
        CacheKey::Transactions,
        CacheKey::Accounts,
        CacheKey::Goals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Summary => "summary",
            CacheKey::Charts => "charts",
            CacheKey::Insights => "insights",
            CacheKey::Transactions => "transactions",
            CacheKey::Accounts => "accounts",
            CacheKey::Goals => "goals",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TTL per bucket. Overridable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub summary: Duration,
    pub charts: Duration,
    pub insights: Duration,
    pub transactions: Duration,
    pub accounts: Duration,
    pub goals: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            summary: Duration::from_secs(5 * 60),
            charts: Duration::from_secs(15 * 60),
            insights: Duration::from_secs(30 * 60),
            transactions: Duration::from_secs(60),
            accounts: Duration::from_secs(5 * 60),
            goals: Duration::from_secs(5 * 60),
        }
    }
}

impl CacheTtls {
    pub fn for_key(&self, key: CacheKey) -> Duration {
        match key {
            CacheKey::Summary => self.summary,
            CacheKey::Charts => self.charts,
            CacheKey::Insights => self.insights,
            CacheKey::Transactions => self.transactions,
            CacheKey::Accounts => self.accounts,
            CacheKey::Goals => self.goals,
        }
    }

    pub fn set(&mut self, key: CacheKey, ttl: Duration) {
        match key {
            CacheKey::Summary => self.summary = ttl,
            CacheKey::Charts => self.charts = ttl,
            CacheKey::Insights => self.insights = ttl,
            CacheKey::Transactions => self.transactions = ttl,
            CacheKey::Accounts => self.accounts = ttl,
            CacheKey::Goals => self.goals = ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.for_key(CacheKey::Summary), Duration::from_secs(300));
        assert_eq!(ttls.for_key(CacheKey::Charts), Duration::from_secs(900));
        assert_eq!(ttls.for_key(CacheKey::Insights), Duration::from_secs(1800));
        assert_eq!(ttls.for_key(CacheKey::Transactions), Duration::from_secs(60));
        assert_eq!(ttls.for_key(CacheKey::Accounts), Duration::from_secs(300));
        assert_eq!(ttls.for_key(CacheKey::Goals), Duration::from_secs(300));
    }

    #[test]
    fn test_override_single_bucket() {
        let mut ttls = CacheTtls::default();
        ttls.set(CacheKey::Transactions, Duration::from_secs(5));
        assert_eq!(ttls.transactions, Duration::from_secs(5));
        assert_eq!(ttls.summary, Duration::from_secs(300));
    }
}
