use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::Orchestrator;

/// Capacity of the shared job queue. A full queue rejects submissions at
/// the boundary rather than buffering without bound.
pub const QUEUE_CAPACITY: usize = 64;

/// Sizing and recycling policy for the worker pool.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Independent workers pulling from the shared queue.
    pub workers: usize,
    /// Completed jobs after which a worker is retired and respawned.
    pub max_jobs_per_worker: u32,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            max_jobs_per_worker: 10,
        }
    }
}

type SharedQueue = Arc<Mutex<mpsc::Receiver<Uuid>>>;

/// A pool of workers pulling pending jobs from a shared queue, one
/// in-flight job per worker. Runs until the queue closes or the pool is
/// dropped.
pub struct WorkerPool {
    supervisors: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn start(
        queue: mpsc::Receiver<Uuid>,
        orchestrator: Arc<Orchestrator>,
        config: WorkerPoolConfig,
    ) -> Self {
        let queue: SharedQueue = Arc::new(Mutex::new(queue));
        let supervisors = (0..config.workers)
            .map(|slot| {
                tokio::spawn(supervise(
                    slot,
                    queue.clone(),
                    orchestrator.clone(),
                    config.max_jobs_per_worker,
                ))
            })
            .collect();

        tracing::info!(workers = config.workers, "worker pool started");
        Self { supervisors }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for handle in &self.supervisors {
            handle.abort();
        }
    }
}

/// Respawn a worker slot each time it retires.
async fn supervise(
    slot: usize,
    queue: SharedQueue,
    orchestrator: Arc<Orchestrator>,
    max_jobs: u32,
) {
    let mut generation: u64 = 0;
    loop {
        generation += 1;
        match run_worker(&queue, &orchestrator, max_jobs).await {
            WorkerExit::Recycled => {
                tracing::debug!(slot, generation, "recycling worker");
            }
            WorkerExit::QueueClosed => {
                tracing::debug!(slot, generation, "queue closed, worker shutting down");
                return;
            }
        }
    }
}

enum WorkerExit {
    Recycled,
    QueueClosed,
}

/// Process jobs one at a time until the recycle bound or queue closure.
async fn run_worker(
    queue: &SharedQueue,
    orchestrator: &Orchestrator,
    max_jobs: u32,
) -> WorkerExit {
    let mut completed: u32 = 0;
    while completed < max_jobs {
        // The lock is held only while waiting for the next id; processing
        // happens with the queue released so other workers can claim.
        let next = { queue.lock().await.recv().await };
        let Some(job_id) = next else {
            return WorkerExit::QueueClosed;
        };

        orchestrator.process(job_id).await;
        completed += 1;
    }
    WorkerExit::Recycled
}
