use serde::{Deserialize, Serialize};

/// Database configuration for the record sink
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file (default: "./spicy-dns.db")
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Pending writes buffered between workers and the flush task
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Rows per multi-row INSERT
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// Mark rows from earlier runs as expired before harvesting
    #[serde(default = "default_true")]
    pub expire_previous: bool,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            channel_capacity: default_channel_capacity(),
            max_batch_size: default_max_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
            expire_previous: true,
        }
    }
}

fn default_db_path() -> String {
    "./spicy-dns.db".to_string()
}

fn default_channel_capacity() -> usize {
    10_000
}

fn default_max_batch_size() -> usize {
    500
}

fn default_flush_interval_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}
