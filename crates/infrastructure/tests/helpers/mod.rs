pub mod dns_server_mock;

#[allow(unused_imports)]
pub use dns_server_mock::{blackhole, MockDnsServer, MOCK_A, MOCK_NS_TARGET, MOCK_TTL, SILENT_DOMAIN};
