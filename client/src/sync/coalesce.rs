//! Collapse concurrent refreshes of one key into a single in-flight call.

use crate::core::error::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

type InFlight<T> = Shared<BoxFuture<'static, Result<T>>>;

/// Per-key in-flight refresh registry.
///
/// The first caller for a key starts the work; callers arriving while it runs
/// await the same shared future and receive a clone of its result, error
/// included. The entry is removed once the call settles, so the next caller
/// starts a new one.
pub struct RefreshCoalescer<K, T> {
    inflight: Mutex<HashMap<K, (u64, InFlight<T>)>>,
    generation: AtomicU64,
}

impl<K, T> Default for RefreshCoalescer<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> RefreshCoalescer<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Join the in-flight call for `key`, or start one with `start`.
    ///
    /// `start` is only invoked when no call is in flight.
    pub async fn run<F, Fut>(&self, key: K, start: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (generation, shared) = {
            let mut inflight = self.inflight.lock();
            match inflight.get(&key) {
                Some((generation, shared)) => {
                    tracing::debug!(generation = generation, "Joining in-flight refresh");
                    (*generation, shared.clone())
                }
                None => {
                    let generation = self.generation.fetch_add(1, Ordering::Relaxed);
                    let shared = start().boxed().shared();
                    inflight.insert(key.clone(), (generation, shared.clone()));
                    (generation, shared)
                }
            }
        };

        let result = shared.await;

        let mut inflight = self.inflight.lock();
        if inflight.get(&key).is_some_and(|(g, _)| *g == generation) {
            inflight.remove(&key);
        }
        result
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.inflight.lock().contains_key(key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.inflight.lock().len()
    }
}
