pub mod answer;
pub mod record;
pub mod record_type;

pub use answer::{AnswerRecord, DnsAnswer};
pub use record::ResolvedRecord;
pub use record_type::RecordType;
