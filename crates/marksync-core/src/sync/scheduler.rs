//! Sync scheduler
//!
//! Owns the periodic sync tasks: one named, cancellable tokio task per
//! sync target instead of ambient timer globals. Each target moves
//! through explicit states (Idle when no task exists, Scheduled while
//! waiting for the next tick, Running while the job executes) observable
//! through a watch channel.
//!
//! Every target carries a non-reentrant guard. The periodic task takes
//! the guard with `try_lock` before invoking its job and skips the tick
//! when the guard is held, so overlapping invocations for one target
//! cannot race on the remote object or the local tree. Callers running a
//! manual sync can hold the same guard via [`SyncScheduler::guard`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// The schedulable sync targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncTarget {
    /// Bidirectional bookmark sync
    Bookmarks,
    /// Tab snapshot upload
    Tabs,
    /// History snapshot upload
    History,
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SyncTarget::Bookmarks => "bookmarks",
            SyncTarget::Tabs => "tabs",
            SyncTarget::History => "history",
        };
        write!(f, "{}", name)
    }
}

/// Observable state of one target's task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// No task scheduled for this target
    Idle,
    /// Task exists and is waiting for its next tick
    Scheduled,
    /// The job is currently executing
    Running,
}

struct ScheduledTask {
    handle: JoinHandle<()>,
    state_rx: watch::Receiver<TaskState>,
}

/// Periodic sync task owner
pub struct SyncScheduler {
    tasks: HashMap<SyncTarget, ScheduledTask>,
    guards: HashMap<SyncTarget, Arc<Mutex<()>>>,
}

impl SyncScheduler {
    /// Create a scheduler with no tasks
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Schedule a job for a target, replacing any existing task
    ///
    /// With `immediate` the job runs right away, then on every interval;
    /// otherwise the first run happens after one full interval. Job
    /// errors are logged and the task continues to the next tick.
    pub fn start<F, Fut>(
        &mut self,
        target: SyncTarget,
        interval: Duration,
        immediate: bool,
        job: F,
    ) where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = crate::error::SyncResult<()>> + Send + 'static,
    {
        self.stop(target);

        let guard = self.guard(target);
        let (state_tx, state_rx) = watch::channel(TaskState::Scheduled);

        info!(%target, interval_secs = interval.as_secs(), "scheduling periodic sync");
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            if !immediate {
                // Consume the immediate first tick
                ticker.tick().await;
            }

            loop {
                ticker.tick().await;

                let Ok(_permit) = guard.try_lock() else {
                    debug!(%target, "previous sync still running, skipping tick");
                    continue;
                };

                let _ = state_tx.send(TaskState::Running);
                if let Err(err) = job().await {
                    warn!(%target, error = %err, "scheduled sync failed");
                }
                let _ = state_tx.send(TaskState::Scheduled);
            }
        });

        self.tasks.insert(target, ScheduledTask { handle, state_rx });
    }

    /// Cancel the task for a target, if any
    pub fn stop(&mut self, target: SyncTarget) -> bool {
        match self.tasks.remove(&target) {
            Some(task) => {
                task.handle.abort();
                info!(%target, "periodic sync stopped");
                true
            }
            None => false,
        }
    }

    /// Cancel all tasks
    pub fn stop_all(&mut self) {
        let targets: Vec<_> = self.tasks.keys().copied().collect();
        for target in targets {
            self.stop(target);
        }
    }

    /// Current state of a target
    pub fn state(&self, target: SyncTarget) -> TaskState {
        match self.tasks.get(&target) {
            Some(task) if !task.handle.is_finished() => *task.state_rx.borrow(),
            _ => TaskState::Idle,
        }
    }

    /// The non-reentrant guard for a target
    ///
    /// Hold this across a manual sync to make the periodic task skip its
    /// ticks for the duration.
    pub fn guard(&mut self, target: SyncTarget) -> Arc<Mutex<()>> {
        self.guards
            .entry(target)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_immediate_job_runs_repeatedly() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SyncScheduler::new();

        let count = counter.clone();
        scheduler.start(SyncTarget::Bookmarks, Duration::from_millis(10), true, move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(counter.load(Ordering::SeqCst) >= 2);
        assert_ne!(scheduler.state(SyncTarget::Bookmarks), TaskState::Idle);
    }

    #[tokio::test]
    async fn test_delayed_start_waits_one_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SyncScheduler::new();

        let count = counter.clone();
        scheduler.start(
            SyncTarget::History,
            Duration::from_secs(60),
            false,
            move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.state(SyncTarget::History), TaskState::Scheduled);
    }

    #[tokio::test]
    async fn test_stop_cancels_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SyncScheduler::new();

        let count = counter.clone();
        scheduler.start(SyncTarget::Tabs, Duration::from_millis(10), true, move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(scheduler.stop(SyncTarget::Tabs));
        assert_eq!(scheduler.state(SyncTarget::Tabs), TaskState::Idle);

        let after_stop = counter.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(counter.load(Ordering::SeqCst), after_stop);

        // Stopping again is a no-op
        assert!(!scheduler.stop(SyncTarget::Tabs));
    }

    #[tokio::test]
    async fn test_start_replaces_existing_task() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SyncScheduler::new();

        let count = first.clone();
        scheduler.start(SyncTarget::Bookmarks, Duration::from_millis(10), true, move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;

        let count = second.clone();
        scheduler.start(SyncTarget::Bookmarks, Duration::from_millis(10), true, move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let first_settled = first.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(first.load(Ordering::SeqCst), first_settled);
        assert!(second.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_held_guard_skips_ticks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SyncScheduler::new();

        let guard = scheduler.guard(SyncTarget::Bookmarks);
        let held = guard.lock().await;

        let count = counter.clone();
        scheduler.start(SyncTarget::Bookmarks, Duration::from_millis(10), true, move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        drop(held);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(counter.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_failing_job_keeps_running() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = SyncScheduler::new();

        let count = counter.clone();
        scheduler.start(SyncTarget::Bookmarks, Duration::from_millis(10), true, move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err(crate::error::SyncError::NotFound("x".to_string()))
            }
        });

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(counter.load(Ordering::SeqCst) >= 2);
        assert_ne!(scheduler.state(SyncTarget::Bookmarks), TaskState::Idle);
    }
}
