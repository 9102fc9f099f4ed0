use super::{DomainName, RecordType};

/// DNS query (domain + record type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryJob {
    pub domain: DomainName,
    pub record_type: RecordType,
}

impl QueryJob {
    pub fn new(domain: DomainName, record_type: RecordType) -> Self {
        Self {
            domain,
            record_type,
        }
    }
}

/// Ordered record types issued for every domain.
///
/// NS always comes first; the configured types follow in their listed order
/// with any NS entry removed, so each domain costs `1 + data_types().len()`
/// queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    types: Vec<RecordType>,
}

impl QueryPlan {
    pub fn new(configured: &[RecordType]) -> Self {
        let mut types = Vec::with_capacity(configured.len() + 1);
        types.push(RecordType::NS);
        types.extend(configured.iter().copied().filter(|t| *t != RecordType::NS));
        Self { types }
    }

    /// Every type in issue order, NS first.
    pub fn types(&self) -> &[RecordType] {
        &self.types
    }

    /// Types issued after the NS lookup.
    pub fn data_types(&self) -> &[RecordType] {
        &self.types[1..]
    }

    pub fn queries_per_domain(&self) -> usize {
        self.types.len()
    }

    pub fn jobs(&self, domain: &DomainName) -> Vec<QueryJob> {
        self.types
            .iter()
            .map(|rt| QueryJob::new(domain.clone(), *rt))
            .collect()
    }
}

impl Default for QueryPlan {
    fn default() -> Self {
        Self::new(&RecordType::default_data_types())
    }
}
