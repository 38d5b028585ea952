//! Named periodic refresh timers.

use crate::debug::task_tracker::spawn_tracked;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Owns at most one timer per key. Dropping the poller aborts every timer.
#[derive(Default)]
pub struct Poller {
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
    debounces: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `refresh` every `period`, first after one full period. Re-arming
    /// a key aborts its previous timer.
    ///
    /// A refresh still running when the next tick is due delays that tick
    /// rather than overlapping with it.
    pub fn arm<F, Fut>(&self, key: impl Into<String>, period: Duration, refresh: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let period = period.max(Duration::from_millis(1));
        let timer_key = key.clone();
        let first_tick = Instant::now() + period;

        let handle = spawn_tracked("poll_timer", async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tracing::debug!(key = %timer_key, "Poll tick");
                refresh().await;
            }
        });

        if let Some(previous) = self.timers.lock().insert(key.clone(), handle) {
            previous.abort();
            tracing::debug!(key = %key, period_ms = period.as_millis(), "Poll timer re-armed");
        } else {
            tracing::debug!(key = %key, period_ms = period.as_millis(), "Poll timer armed");
        }
    }

    /// Run `action` once, `delay` after the latest call for `key`. A call
    /// arriving while the previous one is still waiting aborts it.
    pub fn debounce<Fut>(&self, key: impl Into<String>, delay: Duration, action: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let deadline = Instant::now() + delay;

        let handle = spawn_tracked("debounce_timer", async move {
            tokio::time::sleep_until(deadline).await;
            action.await;
        });

        if let Some(previous) = self.debounces.lock().insert(key.clone(), handle) {
            if !previous.is_finished() {
                previous.abort();
                tracing::debug!(key = %key, "Debounced call superseded");
            }
        }
    }

    /// Debounced calls still waiting for their delay to pass.
    pub fn pending_debounces(&self) -> usize {
        self.debounces.lock().values().filter(|h| !h.is_finished()).count()
    }

    pub fn disarm(&self, key: &str) -> bool {
        match self.timers.lock().remove(key) {
            Some(handle) => {
                handle.abort();
                tracing::debug!(key = %key, "Poll timer disarmed");
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self, key: &str) -> bool {
        self.timers.lock().contains_key(key)
    }

    pub fn armed_count(&self) -> usize {
        self.timers.lock().len()
    }

    /// Abort every timer and pending debounced call.
    pub fn teardown(&self) {
        let mut timers = self.timers.lock();
        let mut count = timers.len();
        for (_, handle) in timers.drain() {
            handle.abort();
        }
        for (_, handle) in self.debounces.lock().drain() {
            if !handle.is_finished() {
                count += 1;
            }
            handle.abort();
        }
        if count > 0 {
            tracing::debug!(count = count, "Poll timers torn down");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.teardown();
    }
}
