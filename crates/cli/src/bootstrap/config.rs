use spicy_dns_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Log the effective configuration; call once logging is up.
pub fn log_config(config_path: Option<&str>, config: &Config) {
    let record_types: Vec<&str> = config.resolver.record_types.iter().map(|t| t.as_str()).collect();

    info!(
        config_file = config_path.unwrap_or("default"),
        nameserver = %config.resolver.nameserver,
        port = config.resolver.port,
        timeout_ms = config.resolver.query_timeout_ms,
        record_types = %record_types.join(","),
        workers = config.pool.workers,
        database = %config.database.path,
        "Configuration loaded"
    );
}
