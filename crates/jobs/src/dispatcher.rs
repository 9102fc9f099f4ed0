use crate::context::HarvestContext;
use crate::summary::RunSummary;
use crate::worker::ResolutionWorkerPool;
use chrono::Utc;
use spicy_dns_domain::config::PoolConfig;
use spicy_dns_domain::DomainName;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Runs one harvest: spawns the worker pool, feeds it every domain, waits
/// for the pool to finish and closes the sink.
pub struct Dispatcher {
    context: HarvestContext,
    workers: usize,
    queue_capacity: usize,
}

impl Dispatcher {
    pub fn new(context: HarvestContext, pool: &PoolConfig) -> Self {
        Self {
            context,
            workers: pool.workers.max(1),
            queue_capacity: pool.queue_capacity.max(1),
        }
    }

    /// Process `domains` and report what happened.
    ///
    /// Invalid names are rejected before they reach the queue. When
    /// `shutdown` fires, feeding and dequeuing stop, in-flight lookups are
    /// dropped, and the sink is still closed so submitted records are kept.
    pub async fn run<I>(self, domains: I, shutdown: CancellationToken) -> RunSummary
    where
        I: IntoIterator<Item = String>,
    {
        let start = Instant::now();
        let started_at = Utc::now();
        let use_case = Arc::new(self.context.resolve_use_case());

        let (sender, receiver) = mpsc::channel::<DomainName>(self.queue_capacity);
        // Only the workers hold the receiver, so a dead pool makes send() fail
        let pool = ResolutionWorkerPool::spawn(
            self.workers,
            Arc::new(Mutex::new(receiver)),
            use_case,
            shutdown.clone(),
        );

        info!(
            workers = pool.size(),
            queue_capacity = self.queue_capacity,
            queries_per_domain = self.context.plan().queries_per_domain(),
            "Harvest started"
        );

        let mut enqueued: u64 = 0;
        let mut rejected: u64 = 0;
        let mut interrupted = false;
        let mut domains = domains.into_iter();

        for raw in domains.by_ref() {
            let domain = match DomainName::parse(&raw) {
                Ok(domain) => domain,
                Err(e) => {
                    rejected += 1;
                    warn!(input = %raw, error = %e, "Rejecting invalid domain");
                    continue;
                }
            };

            let sent = tokio::select! {
                biased;
                _ = shutdown.cancelled() => false,
                result = sender.send(domain) => result.is_ok(),
            };

            if !sent {
                interrupted = true;
                break;
            }
            enqueued += 1;
        }

        // The domain in hand when feeding stopped was never admitted either
        let not_fed = if interrupted {
            1 + domains.count() as u64
        } else {
            0
        };

        // Closing the queue lets workers exit once it is drained
        drop(sender);
        info!(enqueued, rejected, "All domains queued");

        let report = pool.join().await;
        if report.crashed > 0 {
            error!(crashed = report.crashed, "Workers exited abnormally");
        }
        if report.interrupted > 0 {
            warn!(interrupted = report.interrupted, "In-flight domains abandoned");
        }

        let sink = self.context.sink();
        if let Err(e) = sink.close().await {
            error!(error = %e, "Failed to close record sink");
        }

        let unprocessed = enqueued.saturating_sub(report.processed) + not_fed;

        RunSummary {
            workers: self.workers,
            domains_enqueued: enqueued,
            domains_rejected: rejected,
            domains_processed: report.processed,
            domains_without_records: report.without_records,
            domains_unprocessed: unprocessed,
            workers_crashed: report.crashed,
            stats: self.context.stats().snapshot(),
            sink_failed_writes: sink.failed_writes(),
            started_at,
            elapsed: start.elapsed(),
            cancelled: shutdown.is_cancelled() && unprocessed > 0,
        }
    }
}
