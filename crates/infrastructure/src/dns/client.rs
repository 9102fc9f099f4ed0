use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport::{tcp::TcpTransport, udp::UdpTransport, DnsTransport};
use async_trait::async_trait;
use spicy_dns_application::ports::DnsQueryClient;
use spicy_dns_domain::config::ResolverConfig;
use spicy_dns_domain::{ConfigError, DnsAnswer, DomainError, QueryJob};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// `DnsQueryClient` speaking to one recursive nameserver over UDP, with a
/// TCP retry for truncated answers.
pub struct UpstreamQueryClient {
    server_addr: SocketAddr,
    primary: Box<dyn DnsTransport>,
    fallback: Option<Box<dyn DnsTransport>>,
    timeout: Duration,
    recursion_desired: bool,
}

impl UpstreamQueryClient {
    pub fn from_config(config: &ResolverConfig) -> Result<Self, ConfigError> {
        let server_addr = config.server_addr()?;

        let fallback: Option<Box<dyn DnsTransport>> = if config.tcp_fallback {
            Some(Box::new(TcpTransport::new(server_addr)))
        } else {
            None
        };

        Ok(Self::with_transports(
            server_addr,
            Box::new(UdpTransport::new(server_addr)),
            fallback,
            Duration::from_millis(config.query_timeout_ms),
            config.recursion_desired,
        ))
    }

    pub fn with_transports(
        server_addr: SocketAddr,
        primary: Box<dyn DnsTransport>,
        fallback: Option<Box<dyn DnsTransport>>,
        timeout: Duration,
        recursion_desired: bool,
    ) -> Self {
        Self {
            server_addr,
            primary,
            fallback,
            timeout,
            recursion_desired,
        }
    }

    /// Probe the nameserver with `. NS` up to `attempts` times.
    ///
    /// Succeeds on the first parseable response, whatever its rcode.
    pub async fn preflight(&self, attempts: u32) -> Result<(), DomainError> {
        let attempts = attempts.max(1);

        for attempt in 1..=attempts {
            let result = async {
                let (id, bytes) = MessageBuilder::build_root_ns_query(self.recursion_desired)?;
                self.exchange(id, &bytes).await
            }
            .await;

            match result {
                Ok(response) => {
                    info!(
                        server = %self.server_addr,
                        attempt,
                        status = response.status(),
                        root_servers = response.answers.len(),
                        "Nameserver reachable"
                    );
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        server = %self.server_addr,
                        attempt,
                        attempts,
                        error = %e,
                        "Nameserver probe failed"
                    );
                }
            }
        }

        Err(DomainError::NameserverUnreachable {
            server: self.server_addr.to_string(),
            attempts,
        })
    }

    async fn exchange(&self, id: u16, query_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let start = Instant::now();

        let transport_response = self.primary.send(query_bytes, self.timeout).await?;
        let response = ResponseParser::parse(&transport_response.bytes, id)?;

        if !response.truncated {
            return Ok(response);
        }

        let Some(fallback) = &self.fallback else {
            debug!(server = %self.server_addr, "Response truncated, keeping partial answer");
            return Ok(response);
        };

        // The retry shares the query budget; once it is spent the partial answer stands
        let remaining = self.timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            debug!(server = %self.server_addr, "Response truncated, no time left to retry");
            return Ok(response);
        }

        debug!(
            server = %self.server_addr,
            protocol = fallback.protocol_name(),
            "Response truncated (TC bit), retrying"
        );

        let fallback_response = fallback.send(query_bytes, remaining).await?;
        ResponseParser::parse(&fallback_response.bytes, id)
    }
}

#[async_trait]
impl DnsQueryClient for UpstreamQueryClient {
    async fn query(&self, job: &QueryJob) -> Result<DnsAnswer, DomainError> {
        let (id, bytes) = MessageBuilder::build_query(job, self.recursion_desired)?;
        let response = self.exchange(id, &bytes).await?;

        debug!(
            domain = %job.domain,
            record_type = %job.record_type,
            status = response.status(),
            answers = response.answers.len(),
            "Query answered"
        );

        Ok(response.into_answer())
    }

    fn server(&self) -> String {
        self.server_addr.to_string()
    }
}
