use spicy_dns_domain::{DomainError, DomainName};
use std::path::Path;
use tracing::{debug, info, warn};

/// Domains read from a list, in file order, plus how many lines were
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainList {
    pub domains: Vec<String>,
    pub skipped: usize,
}

impl DomainList {
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Parse a single list line.
///
/// Accepted formats:
/// - `# comment` or blank  → `Ok(None)`
/// - `rank,domain[,...]`   → second column
/// - `domain`              → the line itself
///
/// Anything else, or a name that fails validation, is `Err` with the
/// offending text.
pub fn parse_domain_line(line: &str) -> Result<Option<String>, String> {
    let line = line.trim().trim_start_matches('\u{feff}');

    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let candidate = match line.split_once(',') {
        Some((rank, rest)) => {
            if rank.trim().trim_matches('"').parse::<u64>().is_err() {
                return Err(line.to_string());
            }
            rest.split(',').next().unwrap_or_default()
        }
        None => line,
    };

    let candidate = candidate.trim().trim_matches('"');
    DomainName::parse(candidate)
        .map(|name| Some(name.as_str().to_string()))
        .map_err(|_| candidate.to_string())
}

/// Parse an entire list text.
pub fn parse_domain_text(text: &str) -> DomainList {
    let mut list = DomainList::default();

    for (index, line) in text.lines().enumerate() {
        match parse_domain_line(line) {
            Ok(Some(domain)) => list.domains.push(domain),
            Ok(None) => {}
            Err(rejected) => {
                list.skipped += 1;
                debug!(line = index + 1, text = %rejected, "Skipping invalid list entry");
            }
        }
    }

    list
}

pub async fn read_domain_list(path: impl AsRef<Path>) -> Result<DomainList, DomainError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        DomainError::SourceError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let list = parse_domain_text(&String::from_utf8_lossy(&bytes));

    if list.skipped > 0 {
        warn!(
            path = %path.display(),
            skipped = list.skipped,
            "Invalid entries skipped in domain list"
        );
    }
    info!(path = %path.display(), domains = list.len(), "Domain list loaded");

    Ok(list)
}
