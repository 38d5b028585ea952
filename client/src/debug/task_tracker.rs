//! Async task lifecycle tracking

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::task::JoinHandle;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);
static ACTIVE_TASKS: AtomicU64 = AtomicU64::new(0);

/// Tasks spawned through [`spawn_tracked`] that have not finished or been
/// aborted yet.
pub fn active_task_count() -> u64 {
    ACTIVE_TASKS.load(Ordering::Relaxed)
}

/// Decrements the active counter however the task ends, abort included.
struct ActiveGuard {
    name: &'static str,
    task_id: u64,
    start: Instant,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE_TASKS.fetch_sub(1, Ordering::Relaxed);
        tracing::debug!(
            task = %self.name,
            task_id = self.task_id,
            duration_ms = self.start.elapsed().as_millis(),
            "Task finished"
        );
    }
}

/// Spawn an instrumented async task with lifecycle tracking
///
/// # Arguments
///
/// * `name` - Task name for logging (e.g., "poll:dashboard", "toast_expiry")
/// * `future` - The async task to execute
///
/// # Example
///
/// ```rust,ignore
/// spawn_tracked("chat_ws", async move {
///     channel.run().await
/// });
/// ```
pub fn spawn_tracked<F>(name: &'static str, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task_id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    ACTIVE_TASKS.fetch_add(1, Ordering::Relaxed);
    let guard = ActiveGuard {
        name,
        task_id,
        start: Instant::now(),
    };

    tracing::debug!(task = %name, task_id = task_id, "Task spawned");

    tokio::spawn(async move {
        let _guard = guard;
        let result = future.await;

        let elapsed = _guard.start.elapsed();
        if elapsed.as_secs() > 30 {
            tracing::warn!(
                task = %name,
                task_id = task_id,
                duration_ms = elapsed.as_millis(),
                "Task took very long (potential hang)"
            );
        }
        result
    })
}
