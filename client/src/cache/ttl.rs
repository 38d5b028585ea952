//! TTL entries and keyed TTL stores.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

/// Validity report for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStatus {
    pub valid: bool,
    /// Time since the last stamp, `None` when never stamped or invalidated.
    pub age: Option<Duration>,
    /// True when there is no stamp or the stamp is older than the TTL.
    pub expired: bool,
}

/// A single cached value with its stamp and time-to-live.
#[derive(Debug, Clone)]
pub struct TtlEntry<V> {
    data: Option<V>,
    timestamp: Option<Instant>,
    ttl: Duration,
}

impl<V> TtlEntry<V> {
    /// Empty entry; the first `get` misses.
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: None,
            timestamp: None,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        match self.timestamp {
            Some(stamped) => now.saturating_duration_since(stamped) < self.ttl,
            None => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }

    /// Cached value regardless of validity. Used for stale fallback and for
    /// local reconciliation of an expired collection.
    pub fn peek(&self) -> Option<&V> {
        self.data.as_ref()
    }

    pub fn peek_mut(&mut self) -> Option<&mut V> {
        self.data.as_mut()
    }

    /// Store `data` and stamp it now.
    pub fn set(&mut self, data: V) {
        self.data = Some(data);
        self.timestamp = Some(Instant::now());
    }

    /// Re-stamp existing data as fresh. Returns false (and stays invalid)
    /// when there is nothing cached.
    pub fn touch(&mut self) -> bool {
        if self.data.is_some() {
            self.timestamp = Some(Instant::now());
            true
        } else {
            false
        }
    }

    /// Clear data and stamp; the next `get` misses.
    pub fn invalidate(&mut self) {
        self.data = None;
        self.timestamp = None;
    }

    pub fn age(&self) -> Option<Duration> {
        self.timestamp
            .map(|stamped| Instant::now().saturating_duration_since(stamped))
    }

    pub fn status(&self) -> EntryStatus {
        let valid = self.is_valid();
        EntryStatus {
            valid,
            age: self.age(),
            expired: !valid,
        }
    }
}

impl<V: Clone> TtlEntry<V> {
    /// Cached value, only while valid.
    pub fn get(&self) -> Option<V> {
        if self.is_valid() {
            self.data.clone()
        } else {
            None
        }
    }
}

/// Keyed collection of [`TtlEntry`] sharing one TTL. Safe to share between
/// tasks; the lock is never held across an await.
#[derive(Debug)]
pub struct TtlStore<K, V> {
    entries: Mutex<HashMap<K, TtlEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().get(key).and_then(|entry| entry.get())
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        self.entries.lock().get(key).and_then(|entry| entry.peek().cloned())
    }

    pub fn set(&self, key: K, data: V) {
        let ttl = self.ttl;
        self.entries
            .lock()
            .entry(key)
            .or_insert_with(|| TtlEntry::new(ttl))
            .set(data);
    }

    pub fn touch(&self, key: &K) -> bool {
        self.entries
            .lock()
            .get_mut(key)
            .map(|entry| entry.touch())
            .unwrap_or(false)
    }

    pub fn invalidate(&self, key: &K) {
        if let Some(entry) = self.entries.lock().get_mut(key) {
            entry.invalidate();
        }
    }

    pub fn invalidate_all(&self) {
        for entry in self.entries.lock().values_mut() {
            entry.invalidate();
        }
    }

    pub fn status(&self) -> Vec<(K, EntryStatus)> {
        self.entries
            .lock()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.status()))
            .collect()
    }

    /// Status of the freshest bucket, or an empty status when nothing was
    /// ever stored.
    pub fn freshest_status(&self) -> EntryStatus {
        let entries = self.entries.lock();
        entries
            .values()
            .map(|entry| entry.status())
            .filter(|status| status.age.is_some())
            .min_by_key(|status| status.age)
            .unwrap_or(EntryStatus {
                valid: false,
                age: None,
                expired: true,
            })
    }
}
