#![allow(dead_code)]

use async_trait::async_trait;
use spicy_dns_application::ports::{DnsQueryClient, RecordSink};
use spicy_dns_domain::{
    AnswerRecord, DnsAnswer, DomainError, QueryJob, RecordType, ResolvedRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock DnsQueryClient
// ============================================================================

#[derive(Clone)]
pub enum MockReply {
    Answer(Vec<AnswerRecord>),
    Empty,
    Error(DomainError),
}

/// Replies keyed by `(domain, type)`; anything unconfigured is an empty answer.
#[derive(Clone, Default)]
pub struct MockDnsClient {
    replies: Arc<Mutex<HashMap<(String, RecordType), Vec<MockReply>>>>,
    calls: Arc<Mutex<Vec<QueryJob>>>,
}

impl MockDnsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reply(&self, domain: &str, record_type: RecordType, reply: MockReply) {
        self.replies
            .lock()
            .unwrap()
            .insert((domain.to_string(), record_type), vec![reply]);
    }

    /// Replies consumed in order; the last one repeats.
    pub fn set_sequence(&self, domain: &str, record_type: RecordType, replies: Vec<MockReply>) {
        self.replies
            .lock()
            .unwrap()
            .insert((domain.to_string(), record_type), replies);
    }

    pub fn calls(&self) -> Vec<QueryJob> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsQueryClient for MockDnsClient {
    async fn query(&self, job: &QueryJob) -> Result<DnsAnswer, DomainError> {
        self.calls.lock().unwrap().push(job.clone());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&(job.domain.to_string(), job.record_type)) {
                Some(seq) if seq.len() > 1 => Some(seq.remove(0)),
                Some(seq) => seq.first().cloned(),
                None => None,
            }
        };

        match reply {
            Some(MockReply::Answer(records)) => Ok(DnsAnswer::new("NOERROR", records)),
            Some(MockReply::Error(e)) => Err(e),
            Some(MockReply::Empty) | None => Ok(DnsAnswer::empty("NOERROR")),
        }
    }

    fn server(&self) -> String {
        "mock:53".to_string()
    }
}

pub fn a_record(ip: &str, ttl: u32) -> AnswerRecord {
    AnswerRecord {
        record_type: RecordType::A.to_u16(),
        value: ip.to_string(),
        ttl,
    }
}

pub fn ns_record(host: &str, ttl: u32) -> AnswerRecord {
    AnswerRecord {
        record_type: RecordType::NS.to_u16(),
        value: host.to_string(),
        ttl,
    }
}

pub fn cname_record(target: &str, ttl: u32) -> AnswerRecord {
    AnswerRecord {
        record_type: RecordType::CNAME.to_u16(),
        value: target.to_string(),
        ttl,
    }
}

pub fn timeout_error() -> DomainError {
    DomainError::TransportTimeout {
        server: "mock:53".to_string(),
    }
}

// ============================================================================
// Mock RecordSink
// ============================================================================

#[derive(Clone, Default)]
pub struct MockRecordSink {
    records: Arc<Mutex<Vec<ResolvedRecord>>>,
    fail_values: Arc<Mutex<Vec<String>>>,
    attempts: Arc<AtomicU64>,
}

impl MockRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose value matches.
    pub fn fail_on(&self, value: &str) {
        self.fail_values.lock().unwrap().push(value.to_string());
    }

    pub fn records(&self) -> Vec<ResolvedRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordSink for MockRecordSink {
    async fn write(&self, record: ResolvedRecord) -> Result<(), DomainError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_values.lock().unwrap().contains(&record.value) {
            return Err(DomainError::DatabaseError("disk full".to_string()));
        }
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}
