use chrono::{DateTime, Utc};
use spicy_dns_application::services::StatsSnapshot;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one dispatcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub workers: usize,
    pub domains_enqueued: u64,
    /// Inputs that were not valid domain names
    pub domains_rejected: u64,
    pub domains_processed: u64,
    /// Processed domains for which no query returned a record
    pub domains_without_records: u64,
    /// Valid inputs never fully processed: cancelled, or lost to a crashed worker
    pub domains_unprocessed: u64,
    pub workers_crashed: usize,
    pub stats: StatsSnapshot,
    pub sink_failed_writes: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.domains_unprocessed == 0
    }

    pub fn domains_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.domains_processed as f64 / secs
        } else {
            0.0
        }
    }

    pub fn log(&self) {
        info!(
            started_at = %self.started_at.format("%Y-%m-%d %H:%M:%S"),
            workers = self.workers,
            enqueued = self.domains_enqueued,
            rejected = self.domains_rejected,
            processed = self.domains_processed,
            without_records = self.domains_without_records,
            queries = self.stats.queries_issued,
            answered = self.stats.queries_answered,
            empty = self.stats.queries_empty,
            failed = self.stats.queries_failed,
            timeouts = self.stats.timeouts,
            malformed = self.stats.malformed,
            retries = self.stats.retries,
            records = self.stats.records_delivered,
            sink_failures = self.stats.sink_failures + self.sink_failed_writes,
            elapsed_ms = self.elapsed.as_millis() as u64,
            domains_per_sec = format!("{:.1}", self.domains_per_second()),
            "Harvest finished"
        );

        if !self.is_complete() {
            warn!(
                unprocessed = self.domains_unprocessed,
                crashed_workers = self.workers_crashed,
                "Harvest aborted before all domains were processed"
            );
        }
    }
}
