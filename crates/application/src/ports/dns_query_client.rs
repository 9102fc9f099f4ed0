use async_trait::async_trait;
use spicy_dns_domain::{DnsAnswer, DomainError, QueryJob};

/// A single DNS exchange against the configured nameserver.
///
/// Implementations must bound every exchange by a timeout and must return
/// an empty `DnsAnswer` (not an error) when the response carries no answer
/// section.
#[async_trait]
pub trait DnsQueryClient: Send + Sync {
    async fn query(&self, job: &QueryJob) -> Result<DnsAnswer, DomainError>;

    /// Nameserver address, for logging.
    fn server(&self) -> String;
}
