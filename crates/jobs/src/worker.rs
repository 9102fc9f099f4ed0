use futures::future::join_all;
use spicy_dns_application::use_cases::ResolveDomainUseCase;
use spicy_dns_domain::DomainName;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Receive side of the domain queue, shared by every worker.
pub type SharedQueue = Arc<Mutex<mpsc::Receiver<DomainName>>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolReport {
    /// Domains for which every planned query was attempted
    pub processed: u64,
    /// Processed domains that produced no record at all
    pub without_records: u64,
    /// Domains dequeued but abandoned mid-resolution by cancellation
    pub interrupted: u64,
    /// Workers that ended in a panic
    pub crashed: usize,
}

/// Progress shared by every worker; outlives a panicking task.
#[derive(Debug, Default)]
struct PoolProgress {
    processed: AtomicU64,
    without_records: AtomicU64,
    interrupted: AtomicU64,
}

/// Fixed set of interchangeable workers draining one queue.
///
/// A worker exits when the queue is closed and empty, or when the
/// cancellation token fires.
pub struct ResolutionWorkerPool {
    handles: Vec<JoinHandle<()>>,
    progress: Arc<PoolProgress>,
}

impl ResolutionWorkerPool {
    pub fn spawn(
        workers: usize,
        queue: SharedQueue,
        use_case: Arc<ResolveDomainUseCase>,
        shutdown: CancellationToken,
    ) -> Self {
        let progress = Arc::new(PoolProgress::default());
        let handles = (0..workers.max(1))
            .map(|_| {
                tokio::spawn(run_worker(
                    Arc::clone(&queue),
                    Arc::clone(&use_case),
                    Arc::clone(&progress),
                    shutdown.clone(),
                ))
            })
            .collect();

        Self { handles, progress }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker. Domains finished by a worker that later
    /// panicked still count as processed.
    pub async fn join(self) -> PoolReport {
        let mut crashed = 0;

        for result in join_all(self.handles).await {
            if let Err(e) = result {
                crashed += 1;
                error!(error = %e, "Resolution worker failed");
            }
        }

        PoolReport {
            processed: self.progress.processed.load(Ordering::Acquire),
            without_records: self.progress.without_records.load(Ordering::Acquire),
            interrupted: self.progress.interrupted.load(Ordering::Acquire),
            crashed,
        }
    }
}

async fn run_worker(
    queue: SharedQueue,
    use_case: Arc<ResolveDomainUseCase>,
    progress: Arc<PoolProgress>,
    shutdown: CancellationToken,
) {
    loop {
        // One worker parks in recv(); the rest wait on the lock
        let next = tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            domain = async { queue.lock().await.recv().await } => domain,
        };

        let Some(domain) = next else {
            break;
        };

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                progress.interrupted.fetch_add(1, Ordering::AcqRel);
                debug!(domain = %domain, "Resolution interrupted");
                break;
            }
            outcome = use_case.execute(&domain) => {
                if outcome.records == 0 {
                    progress.without_records.fetch_add(1, Ordering::AcqRel);
                }
                progress.processed.fetch_add(1, Ordering::AcqRel);
            }
        }
    }
}
