//! Configuration module for Spicy DNS
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `resolver`: Nameserver address, timeouts, record types and retry policy
//! - `pool`: Worker count and queue sizing
//! - `database`: Record sink storage
//! - `source`: Where the domain list comes from
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod database;
pub mod errors;
pub mod logging;
pub mod pool;
pub mod resolver;
pub mod root;
pub mod source;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use pool::PoolConfig;
pub use resolver::{ResolverConfig, RetryConfig};
pub use root::{CliOverrides, Config};
pub use source::SourceConfig;
