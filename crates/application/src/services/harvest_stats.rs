use spicy_dns_domain::DomainError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Run-wide counters shared by every worker.
#[derive(Debug, Default)]
pub struct HarvestStats {
    domains_processed: AtomicU64,
    queries_issued: AtomicU64,
    queries_answered: AtomicU64,
    queries_empty: AtomicU64,
    queries_failed: AtomicU64,
    timeouts: AtomicU64,
    malformed: AtomicU64,
    retries: AtomicU64,
    records_delivered: AtomicU64,
    sink_failures: AtomicU64,
}

/// Point-in-time copy of `HarvestStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub domains_processed: u64,
    pub queries_issued: u64,
    pub queries_answered: u64,
    pub queries_empty: u64,
    pub queries_failed: u64,
    pub timeouts: u64,
    pub malformed: u64,
    pub retries: u64,
    pub records_delivered: u64,
    pub sink_failures: u64,
}

impl HarvestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_domain(&self) {
        self.domains_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_query(&self, attempts: u32) {
        self.queries_issued.fetch_add(1, Ordering::Relaxed);
        if attempts > 1 {
            self.retries
                .fetch_add(u64::from(attempts - 1), Ordering::Relaxed);
        }
    }

    pub fn record_answered(&self) {
        self.queries_answered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty(&self) {
        self.queries_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, error: &DomainError) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
        if error.is_timeout() {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        } else if matches!(error, DomainError::InvalidDnsResponse(_)) {
            self.malformed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_delivered(&self) {
        self.records_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            domains_processed: self.domains_processed.load(Ordering::Relaxed),
            queries_issued: self.queries_issued.load(Ordering::Relaxed),
            queries_answered: self.queries_answered.load(Ordering::Relaxed),
            queries_empty: self.queries_empty.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            records_delivered: self.records_delivered.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
        }
    }
}
