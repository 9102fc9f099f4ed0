//! Spicy DNS Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod domain_name;
pub mod errors;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::{QueryJob, QueryPlan};
pub use dns_record::{AnswerRecord, DnsAnswer, RecordType, ResolvedRecord};
pub use domain_name::DomainName;
pub use errors::DomainError;
