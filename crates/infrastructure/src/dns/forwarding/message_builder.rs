//! DNS Message Builder
//!
//! Constructs DNS query messages in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use spicy_dns_domain::{DomainError, QueryJob};

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a query for `job` and return its id together with the wire bytes.
    ///
    /// The question is the fully qualified name (trailing dot); non-ASCII
    /// labels are converted to their IDNA form.
    pub fn build_query(job: &QueryJob, recursion_desired: bool) -> Result<(u16, Vec<u8>), DomainError> {
        let fqdn = job.domain.fqdn();
        let name = Name::from_utf8(&fqdn).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", fqdn, e))
        })?;

        Self::build(name, RecordTypeMapper::to_hickory(&job.record_type), recursion_desired)
    }

    /// `. NS IN`, used to probe that the nameserver answers at all.
    pub fn build_root_ns_query(recursion_desired: bool) -> Result<(u16, Vec<u8>), DomainError> {
        Self::build(Name::root(), RecordType::NS, recursion_desired)
    }

    fn build(
        name: Name,
        record_type: RecordType,
        recursion_desired: bool,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(record_type);
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(recursion_desired);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    /// Serialize a Message to wire format bytes
    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
