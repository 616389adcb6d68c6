use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use crate::core::{FileTask, TaskOutcome};
use crate::utils::{CodecError, ConfigError};

/// Bounded-concurrency executor for file work items.
///
/// Cloning shares the underlying semaphore, so every clone draws from the same
/// pool of permits. Hand one pool to several [`run_all`](Self::run_all) calls to
/// cap them jointly; create separate pools to cap them independently.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    worker_count: usize,
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> Result<Self, ConfigError> {
        if worker_count == 0 {
            return Err(ConfigError::InvalidConcurrency(worker_count));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(worker_count)),
            worker_count,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Runs `work` for every task with at most `worker_count` in flight.
    ///
    /// A permit is acquired before each item is spawned and released when it
    /// finishes, so the next queued item starts as soon as any slot frees up.
    /// Admission is FIFO. Every task yields exactly one outcome: a panic in
    /// `work` becomes a `failed` outcome for that task only.
    pub async fn run_all<F, Fut>(&self, tasks: Vec<FileTask>, work: F) -> Vec<TaskOutcome>
    where
        F: Fn(FileTask) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskOutcome> + Send + 'static,
    {
        let work = Arc::new(work);
        let mut outcomes = Vec::with_capacity(tasks.len());
        let mut handles = Vec::with_capacity(tasks.len());

        for task in tasks {
            let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!("Failed to acquire worker for {}: {}", task.file_name, e);
                    outcomes.push(TaskOutcome::failed(&task, CodecError::worker(e)));
                    continue;
                }
            };
            debug!(
                "Worker started - Active: {}/{}, Task: {}",
                self.worker_count - self.semaphore.available_permits(),
                self.worker_count,
                task.file_name
            );

            let work = Arc::clone(&work);
            let fallback = task.clone();
            let handle = tokio::spawn(async move {
                let outcome = work(task).await;
                drop(permit);
                outcome
            });
            handles.push((fallback, handle));
        }

        for (task, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!("Worker for {} did not complete: {}", task.file_name, e);
                    outcomes.push(TaskOutcome::failed(&task, CodecError::from(e)));
                }
            }
        }

        outcomes
    }
}
