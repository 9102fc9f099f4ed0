use super::domain_list::{read_domain_list, DomainList};
use spicy_dns_domain::DomainError;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const ARCHIVE_NAME: &str = "domains.zip";

/// Download a zipped domain list and read the single file inside it.
///
/// Everything is staged in a temporary directory that is removed when this
/// function returns, on success or failure.
pub async fn fetch_domain_archive(url: &str, timeout: Duration) -> Result<DomainList, DomainError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DomainError::SourceError(format!("HTTP client error: {}", e)))?;

    info!(url, "Downloading domain archive");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DomainError::SourceError(format!("fetch error for {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(DomainError::SourceError(format!(
            "HTTP {} for {}",
            response.status().as_u16(),
            url
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| DomainError::SourceError(format!("read error for {}: {}", url, e)))?;

    debug!(url, bytes = body.len(), "Domain archive downloaded");

    let workdir = tempfile::Builder::new()
        .prefix("spicy-dns-")
        .tempdir()
        .map_err(|e| DomainError::SourceError(format!("temp dir: {}", e)))?;

    let archive_path = workdir.path().join(ARCHIVE_NAME);
    tokio::fs::write(&archive_path, &body)
        .await
        .map_err(|e| DomainError::SourceError(format!("write {}: {}", archive_path.display(), e)))?;

    let extract_dir = workdir.path().join("extracted");
    let extracted = tokio::task::spawn_blocking(move || extract_single_file(&archive_path, &extract_dir))
        .await
        .map_err(|e| DomainError::SourceError(format!("extract task failed: {}", e)))??;

    read_domain_list(&extracted).await
}

/// Extract `archive` into `dest`, which must yield exactly one regular file.
pub fn extract_single_file(archive: &Path, dest: &Path) -> Result<PathBuf, DomainError> {
    let file = File::open(archive)
        .map_err(|e| DomainError::SourceError(format!("open {}: {}", archive.display(), e)))?;
    let mut zip = zip::ZipArchive::new(file)
        .map_err(|e| DomainError::SourceError(format!("invalid archive: {}", e)))?;

    let mut extracted: Vec<PathBuf> = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| DomainError::SourceError(format!("archive entry {}: {}", index, e)))?;

        if entry.is_dir() {
            continue;
        }

        let relative = entry.enclosed_name().ok_or_else(|| {
            DomainError::SourceError(format!("archive entry escapes target: {}", entry.name()))
        })?;
        let target = dest.join(relative);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::SourceError(format!("create {}: {}", parent.display(), e)))?;
        }

        let mut out = File::create(&target)
            .map_err(|e| DomainError::SourceError(format!("create {}: {}", target.display(), e)))?;
        std::io::copy(&mut entry, &mut out)
            .map_err(|e| DomainError::SourceError(format!("extract {}: {}", target.display(), e)))?;

        extracted.push(target);
    }

    match extracted.len() {
        1 => Ok(extracted.remove(0)),
        n => Err(DomainError::SourceError(format!(
            "expected exactly one file in archive, found {}",
            n
        ))),
    }
}
