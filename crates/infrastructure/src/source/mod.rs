pub mod archive;
pub mod domain_list;

pub use archive::{extract_single_file, fetch_domain_archive};
pub use domain_list::{parse_domain_line, parse_domain_text, read_domain_list, DomainList};

use spicy_dns_domain::config::SourceConfig;
use spicy_dns_domain::DomainError;
use std::time::Duration;

/// Load the configured domain list; a local path wins over a URL.
pub async fn load_domains(config: &SourceConfig) -> Result<DomainList, DomainError> {
    match (&config.path, &config.url) {
        (Some(path), _) => read_domain_list(path).await,
        (None, Some(url)) => {
            fetch_domain_archive(url, Duration::from_secs(config.download_timeout_secs)).await
        }
        (None, None) => Err(DomainError::SourceError(
            "no domain source configured".to_string(),
        )),
    }
}
