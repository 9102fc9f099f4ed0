/// One answer-section record, stripped of wire details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub record_type: u16,
    pub value: String,
    pub ttl: u32,
}

/// Outcome of a single DNS exchange.
///
/// A response without an answer section is represented by an empty
/// `records` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    /// Response code in presentation form ("NOERROR", "NXDOMAIN", ...)
    pub status: &'static str,
    pub records: Vec<AnswerRecord>,
}

impl DnsAnswer {
    pub fn new(status: &'static str, records: Vec<AnswerRecord>) -> Self {
        Self { status, records }
    }

    pub fn empty(status: &'static str) -> Self {
        Self {
            status,
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
