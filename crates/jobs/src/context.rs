use spicy_dns_application::ports::{DnsQueryClient, RecordSink};
use spicy_dns_application::services::{HarvestStats, RetryPolicy};
use spicy_dns_application::use_cases::ResolveDomainUseCase;
use spicy_dns_domain::QueryPlan;
use std::sync::Arc;

/// Everything a harvest run shares: built once, then handed to the
/// dispatcher.
pub struct HarvestContext {
    client: Arc<dyn DnsQueryClient>,
    sink: Arc<dyn RecordSink>,
    plan: QueryPlan,
    retry: RetryPolicy,
    stats: Arc<HarvestStats>,
}

impl HarvestContext {
    pub fn new(client: Arc<dyn DnsQueryClient>, sink: Arc<dyn RecordSink>, plan: QueryPlan) -> Self {
        Self {
            client,
            sink,
            plan,
            retry: RetryPolicy::none(),
            stats: Arc::new(HarvestStats::new()),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    pub fn sink(&self) -> &Arc<dyn RecordSink> {
        &self.sink
    }

    pub fn stats(&self) -> &Arc<HarvestStats> {
        &self.stats
    }

    pub fn resolve_use_case(&self) -> ResolveDomainUseCase {
        ResolveDomainUseCase::new(
            Arc::clone(&self.client),
            Arc::clone(&self.sink),
            self.plan.clone(),
            Arc::clone(&self.stats),
        )
        .with_retry(self.retry.clone())
    }
}
