use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use super::ConfigError;
use crate::RecordType;

/// Retry policy for transport failures.
///
/// `max_attempts` counts the first try, so the default of 1 never retries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Recursive resolver the harvest runs against
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Nameserver IP address (default: "127.0.0.1")
    #[serde(default = "default_nameserver")]
    pub nameserver: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Query timeout in milliseconds. Bounds the whole exchange, including
    /// the TCP retry of a truncated answer.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_true")]
    pub recursion_desired: bool,

    /// Types queried after the NS lookup, in order
    #[serde(default = "RecordType::default_data_types")]
    pub record_types: Vec<RecordType>,

    /// Re-send truncated UDP answers over TCP
    #[serde(default = "default_true")]
    pub tcp_fallback: bool,

    /// Root NS probes before the run is declared unreachable
    #[serde(default = "default_preflight_attempts")]
    pub preflight_attempts: u32,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl ResolverConfig {
    pub fn server_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.nameserver.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "nameserver must be an IP address, got '{}'",
                self.nameserver
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            nameserver: default_nameserver(),
            port: default_port(),
            query_timeout_ms: default_query_timeout(),
            recursion_desired: true,
            record_types: RecordType::default_data_types(),
            tcp_fallback: true,
            preflight_attempts: default_preflight_attempts(),
            retry: RetryConfig::default(),
        }
    }
}

fn default_nameserver() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    53
}

fn default_query_timeout() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_preflight_attempts() -> u32 {
    3
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    2000
}
