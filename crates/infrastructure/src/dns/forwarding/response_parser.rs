use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record};
use spicy_dns_domain::{AnswerRecord, DnsAnswer, DomainError};
use tracing::debug;

const HEADER_LEN: usize = 12;
const QR_BIT: u8 = 0x80;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    /// Answer section; empty when the response carried none.
    pub answers: Vec<AnswerRecord>,
}

impl DnsResponse {
    pub fn status(&self) -> &'static str {
        ResponseParser::rcode_to_status(self.rcode)
    }

    pub fn into_answer(self) -> DnsAnswer {
        DnsAnswer::new(self.status(), self.answers)
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parse the response to the query with id `expected_id`.
    ///
    /// Short or empty datagrams, non-response messages and id mismatches are
    /// `InvalidDnsResponse`. A well-formed response without an answer section
    /// parses to an empty `answers` list.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<DnsResponse, DomainError> {
        if response_bytes.len() < HEADER_LEN {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response of {} bytes is shorter than a DNS header",
                response_bytes.len()
            )));
        }

        let id = u16::from_be_bytes([response_bytes[0], response_bytes[1]]);
        if id != expected_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response id {} does not match query id {}",
                id, expected_id
            )));
        }
        if response_bytes[2] & QR_BIT == 0 {
            return Err(DomainError::InvalidDnsResponse(
                "message is a query, not a response".to_string(),
            ));
        }

        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();
        let answers: Vec<AnswerRecord> = message.answers().iter().map(Self::to_answer).collect();

        debug!(
            rcode = ?rcode,
            answers = answers.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            id,
            rcode,
            truncated,
            answers,
        })
    }

    fn to_answer(record: &Record) -> AnswerRecord {
        let value = match record.data() {
            RData::A(a) => a.0.to_string(),
            RData::AAAA(aaaa) => aaaa.0.to_string(),
            RData::NS(ns) => Self::host(ns.to_utf8()),
            RData::CNAME(canonical) => Self::host(canonical.to_utf8()),
            RData::PTR(ptr) => Self::host(ptr.to_utf8()),
            other => other.to_string(),
        };

        AnswerRecord {
            record_type: u16::from(record.record_type()),
            value,
            ttl: record.ttl(),
        }
    }

    /// Names are stored the way domains are: without the root dot.
    fn host(name: String) -> String {
        match name.strip_suffix('.') {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => name,
        }
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
