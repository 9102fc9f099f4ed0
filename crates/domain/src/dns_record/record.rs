use crate::DomainName;

/// A single answer record ready for the sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedRecord {
    /// Domain that was queried (not the answer's owner name)
    pub domain: DomainName,
    /// Wire type code of the answer record
    pub record_type: u16,
    /// Presentation form of the record data
    pub value: String,
    /// Time to live in seconds
    pub ttl: u32,
    pub expired: bool,
}

impl ResolvedRecord {
    /// Create a fresh (non-expired) record
    pub fn new(domain: DomainName, record_type: u16, value: impl Into<String>, ttl: u32) -> Self {
        Self {
            domain,
            record_type,
            value: value.into(),
            ttl,
            expired: false,
        }
    }
}
