//! # Spicy DNS
//!
//! Resolves a bulk domain list against one recursive nameserver and stores
//! every answer record in SQLite.

mod bootstrap;

use anyhow::Context;
use clap::Parser;
use spicy_dns_application::services::RetryPolicy;
use spicy_dns_domain::{CliOverrides, DomainError, QueryPlan, RecordType};
use spicy_dns_infrastructure::dns::UpstreamQueryClient;
use spicy_dns_infrastructure::repositories::SqliteRecordRepository;
use spicy_dns_infrastructure::source::load_domains;
use spicy_dns_jobs::{Dispatcher, HarvestContext};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "spicy-dns")]
#[command(version)]
#[command(about = "Bulk DNS harvester: resolve a domain list and store every answer")]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Concurrent resolution workers
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Recursive nameserver IP address
    #[arg(short = 'n', long)]
    nameserver: Option<String>,

    /// Nameserver port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Per-query timeout in milliseconds
    #[arg(short = 't', long)]
    timeout_ms: Option<u64>,

    /// Record types queried after NS, e.g. A,AAAA,CNAME
    #[arg(short = 'r', long, value_delimiter = ',')]
    record_types: Option<Vec<RecordType>>,

    /// Attempts per query, counting the first
    #[arg(long)]
    retry_attempts: Option<u32>,

    /// SQLite database file
    #[arg(short = 'd', long)]
    database: Option<String>,

    /// Local CSV or plain-text domain list
    #[arg(short = 'i', long)]
    input: Option<String>,

    /// Zipped domain list to download when no input file is given
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Cli> for CliOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            nameserver: cli.nameserver,
            port: cli.port,
            workers: cli.workers,
            query_timeout_ms: cli.timeout_ms,
            record_types: cli.record_types,
            retry_attempts: cli.retry_attempts,
            database_path: cli.database,
            input: cli.input,
            url: cli.url,
            log_level: cli.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();
    let config_path = cli.config.take();

    let config = bootstrap::load_config(config_path.as_deref(), cli.into())?;
    bootstrap::init_logging(&config);
    bootstrap::log_config(config_path.as_deref(), &config);

    let pool = bootstrap::init_database(&config.database).await?;

    let client = UpstreamQueryClient::from_config(&config.resolver)?;
    client
        .preflight(config.resolver.preflight_attempts)
        .await
        .context("nameserver preflight failed")?;

    let list = load_domains(&config.source)
        .await
        .context("failed to load domain list")?;
    info!(domains = list.len(), skipped = list.skipped, "Domain list loaded");

    let repository = Arc::new(SqliteRecordRepository::new(pool, &config.database));
    if config.database.expire_previous {
        repository.expire_previous().await?;
    }

    let context = HarvestContext::new(
        Arc::new(client),
        repository,
        QueryPlan::new(&config.resolver.record_types),
    )
    .with_retry(RetryPolicy::from_config(&config.resolver.retry));

    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone());

    let summary = Dispatcher::new(context, &config.pool)
        .run(list.domains, shutdown)
        .await;
    summary.log();

    if summary.cancelled {
        return Err(anyhow::Error::new(DomainError::Cancelled).context(format!(
            "{} domains unprocessed",
            summary.domains_unprocessed
        )));
    }
    if !summary.is_complete() {
        anyhow::bail!(
            "harvest incomplete: {} domains unprocessed",
            summary.domains_unprocessed
        );
    }

    Ok(())
}

fn spawn_signal_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, stopping harvest");
                shutdown.cancel();
            }
            Err(e) => warn!(error = %e, "Failed to listen for interrupt"),
        }
    });
}
