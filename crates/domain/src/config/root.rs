use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ConfigError, DatabaseConfig, LoggingConfig, PoolConfig, ResolverConfig, SourceConfig};
use crate::RecordType;

const MAX_WORKERS: usize = 10_000;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Values supplied on the command line; each `Some` replaces the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub nameserver: Option<String>,
    pub port: Option<u16>,
    pub workers: Option<usize>,
    pub query_timeout_ms: Option<u64>,
    pub record_types: Option<Vec<RecordType>>,
    pub retry_attempts: Option<u32>,
    pub database_path: Option<String>,
    pub input: Option<String>,
    pub url: Option<String>,
    pub log_level: Option<String>,
}

/// Complete run configuration, immutable once loaded.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub pool: PoolConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from an optional TOML file, then apply CLI overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(nameserver) = overrides.nameserver {
            self.resolver.nameserver = nameserver;
        }
        if let Some(port) = overrides.port {
            self.resolver.port = port;
        }
        if let Some(workers) = overrides.workers {
            self.pool.workers = workers;
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.resolver.query_timeout_ms = timeout;
        }
        if let Some(types) = overrides.record_types {
            self.resolver.record_types = types;
        }
        if let Some(attempts) = overrides.retry_attempts {
            self.resolver.retry.max_attempts = attempts;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(input) = overrides.input {
            self.source.path = Some(input);
        }
        if let Some(url) = overrides.url {
            self.source.url = Some(url);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.server_addr()?;

        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.query_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.resolver.preflight_attempts == 0 {
            return Err(ConfigError::Validation(
                "resolver.preflight_attempts must be at least 1".into(),
            ));
        }
        if self.resolver.retry.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "resolver.retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.resolver.retry.initial_backoff_ms > self.resolver.retry.max_backoff_ms {
            return Err(ConfigError::Validation(
                "resolver.retry.initial_backoff_ms cannot exceed max_backoff_ms".into(),
            ));
        }
        if self.pool.workers == 0 || self.pool.workers > MAX_WORKERS {
            return Err(ConfigError::Validation(format!(
                "pool.workers must be between 1 and {}, got {}",
                MAX_WORKERS, self.pool.workers
            )));
        }
        if self.pool.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "pool.queue_capacity must be at least 1".into(),
            ));
        }
        if self.database.channel_capacity == 0 || self.database.max_batch_size == 0 {
            return Err(ConfigError::Validation(
                "database.channel_capacity and database.max_batch_size must be at least 1".into(),
            ));
        }
        if self.source.path.is_none() && self.source.url.is_none() {
            return Err(ConfigError::Validation(
                "either source.path or source.url must be set".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }
}
