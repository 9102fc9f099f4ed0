#![allow(dead_code)]

use async_trait::async_trait;
use spicy_dns_application::ports::{DnsQueryClient, RecordSink};
use spicy_dns_domain::{
    AnswerRecord, DnsAnswer, DomainError, QueryJob, RecordType, ResolvedRecord,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SILENT_DOMAIN: &str = "nosuchdomain.invalid";
pub const MOCK_IP: &str = "93.184.216.34";
/// Querying this domain panics inside the client.
pub const PANIC_DOMAIN: &str = "boom.com";

// ============================================================================
// Mock DnsQueryClient
// ============================================================================

/// Deterministic resolver: one `A` and one `NS` answer per domain, an empty
/// answer for every other type, a timeout for `SILENT_DOMAIN` and a panic
/// for `PANIC_DOMAIN`.
#[derive(Clone, Default)]
pub struct MockDnsClient {
    delay: Duration,
    calls: Arc<Mutex<Vec<QueryJob>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockDnsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query takes at least `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<QueryJob> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of queries observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// How many times `domain` was queried for `record_type`.
    pub fn count_for(&self, domain: &str, record_type: RecordType) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|job| job.domain.as_str() == domain && job.record_type == record_type)
            .count()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DnsQueryClient for MockDnsClient {
    async fn query(&self, job: &QueryJob) -> Result<DnsAnswer, DomainError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.calls.lock().unwrap().push(job.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if job.domain.as_str() == PANIC_DOMAIN {
            panic!("mock client failure for {}", job.domain);
        }

        if job.domain.as_str() == SILENT_DOMAIN {
            return Err(DomainError::TransportTimeout {
                server: "mock:53".to_string(),
            });
        }

        let records = match job.record_type {
            RecordType::A => vec![AnswerRecord {
                record_type: RecordType::A.to_u16(),
                value: MOCK_IP.to_string(),
                ttl: 3600,
            }],
            RecordType::NS => vec![AnswerRecord {
                record_type: RecordType::NS.to_u16(),
                value: format!("ns1.{}", job.domain),
                ttl: 86400,
            }],
            _ => Vec::new(),
        };

        Ok(DnsAnswer::new("NOERROR", records))
    }

    fn server(&self) -> String {
        "mock:53".to_string()
    }
}

// ============================================================================
// Mock RecordSink
// ============================================================================

#[derive(Clone, Default)]
pub struct MockRecordSink {
    records: Arc<Mutex<Vec<ResolvedRecord>>>,
    closed: Arc<AtomicBool>,
    close_calls: Arc<AtomicU64>,
}

impl MockRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ResolvedRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn close_calls(&self) -> u64 {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSink for MockRecordSink {
    async fn write(&self, record: ResolvedRecord) -> Result<(), DomainError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DomainError::SinkClosed);
        }
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn close(&self) -> Result<(), DomainError> {
        self.closed.store(true, Ordering::SeqCst);
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
