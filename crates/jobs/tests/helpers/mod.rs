pub mod dns_server_mock;
pub mod mock_ports;

#[allow(unused_imports)]
pub use dns_server_mock::MockDnsServer;
#[allow(unused_imports)]
pub use mock_ports::*;
