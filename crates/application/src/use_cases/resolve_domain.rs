use crate::ports::{DnsQueryClient, RecordSink};
use crate::services::{HarvestStats, RetryPolicy};
use spicy_dns_domain::{DomainError, DomainName, QueryJob, QueryPlan, RecordType, ResolvedRecord};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// What happened to one `(domain, type)` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// At least one answer record; `delivered` of them reached the sink.
    Answered { records: usize, delivered: usize },
    /// Response carried no answer section.
    Empty { status: &'static str },
    Failed(DomainError),
}

/// Per-domain tally returned to the worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainOutcome {
    pub queries: usize,
    pub failures: usize,
    pub records: usize,
}

/// Use case: resolve one domain for every type in the query plan and hand
/// each answer record to the sink.
///
/// Queries run in plan order (NS first). A failing query is logged and
/// counted; the remaining types are still attempted.
pub struct ResolveDomainUseCase {
    client: Arc<dyn DnsQueryClient>,
    sink: Arc<dyn RecordSink>,
    plan: QueryPlan,
    retry: RetryPolicy,
    stats: Arc<HarvestStats>,
}

impl ResolveDomainUseCase {
    pub fn new(
        client: Arc<dyn DnsQueryClient>,
        sink: Arc<dyn RecordSink>,
        plan: QueryPlan,
        stats: Arc<HarvestStats>,
    ) -> Self {
        Self {
            client,
            sink,
            plan,
            retry: RetryPolicy::none(),
            stats,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    pub fn stats(&self) -> &Arc<HarvestStats> {
        &self.stats
    }

    pub async fn execute(&self, domain: &DomainName) -> DomainOutcome {
        let mut outcome = DomainOutcome::default();

        for job in self.plan.jobs(domain) {
            outcome.queries += 1;
            match self.resolve_one(&job).await {
                QueryOutcome::Answered { delivered, .. } => outcome.records += delivered,
                QueryOutcome::Empty { .. } | QueryOutcome::Failed(_) => outcome.failures += 1,
            }
        }

        self.stats.record_domain();
        debug!(
            domain = %domain,
            queries = outcome.queries,
            failures = outcome.failures,
            records = outcome.records,
            "Domain resolved"
        );
        outcome
    }

    pub async fn resolve_one(&self, job: &QueryJob) -> QueryOutcome {
        let attempted = self.retry.run(|| self.client.query(job)).await;
        self.stats.record_query(attempted.attempts);

        let answer = match attempted.result {
            Ok(answer) => answer,
            Err(e) => {
                self.stats.record_failure(&e);
                warn!(
                    domain = %job.domain,
                    record_type = %job.record_type,
                    server = %self.client.server(),
                    attempts = attempted.attempts,
                    error = %e,
                    "Query failed"
                );
                return QueryOutcome::Failed(e);
            }
        };

        if answer.is_empty() {
            self.stats.record_empty();
            debug!(
                domain = %job.domain,
                record_type = %job.record_type,
                status = answer.status,
                "No answers"
            );
            return QueryOutcome::Empty {
                status: answer.status,
            };
        }

        self.stats.record_answered();
        let records = answer.records.len();
        let mut delivered = 0;

        for rr in answer.records {
            if rr.record_type != job.record_type.to_u16() {
                debug!(
                    domain = %job.domain,
                    queried = %job.record_type,
                    answered = RecordType::from_u16(rr.record_type).map_or("other", |t| t.as_str()),
                    code = rr.record_type,
                    "Answer type differs from query"
                );
            }
            let record = ResolvedRecord::new(job.domain.clone(), rr.record_type, rr.value, rr.ttl);
            match self.sink.write(record).await {
                Ok(()) => {
                    delivered += 1;
                    self.stats.record_delivered();
                }
                Err(e) => {
                    self.stats.record_sink_failure();
                    error!(
                        domain = %job.domain,
                        record_type = rr.record_type,
                        error = %e,
                        "Failed to submit record to sink"
                    );
                }
            }
        }

        QueryOutcome::Answered { records, delivered }
    }
}
