pub mod dns_query_client;
pub mod record_sink;

pub use dns_query_client::DnsQueryClient;
pub use record_sink::RecordSink;
