use super::DomainError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A hostname queued for resolution.
///
/// Stored without the trailing dot; `fqdn()` produces the wire form.
/// Backed by `Arc<str>` so results can reference it without copying.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(Arc<str>);

impl DomainName {
    /// Parse and validate a domain name.
    ///
    /// Surrounding whitespace and a single trailing dot are stripped.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let name = trimmed.strip_suffix('.').unwrap_or(trimmed);

        if name.is_empty() {
            return Err(DomainError::InvalidDomainName(
                "domain name cannot be empty".to_string(),
            ));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' exceeds {} characters",
                name, MAX_NAME_LEN
            )));
        }
        for label in name.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}' contains an empty label",
                    name
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' exceeds {} characters",
                    label, MAX_LABEL_LEN
                )));
            }
            if label.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(DomainError::InvalidDomainName(format!(
                    "'{}' contains whitespace or control characters",
                    name
                )));
            }
        }

        Ok(Self(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified form with the trailing label separator.
    pub fn fqdn(&self) -> String {
        format!("{}.", self.0)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_whitespace_and_trailing_dot() {
        let name = DomainName::parse("  example.com. ").unwrap();
        assert_eq!(name.as_str(), "example.com");
        assert_eq!(name.fqdn(), "example.com.");
    }

    #[test]
    fn test_parse_keeps_unicode_labels() {
        let name = DomainName::parse("bücher.example").unwrap();
        assert_eq!(name.to_string(), "bücher.example");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(DomainName::parse("").is_err());
        assert!(DomainName::parse("   ").is_err());
        assert!(DomainName::parse(".").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_label() {
        assert!(DomainName::parse("example..com").is_err());
        assert!(DomainName::parse(".example.com").is_err());
    }

    #[test]
    fn test_parse_rejects_long_label() {
        let label = "a".repeat(64);
        assert!(DomainName::parse(&format!("{}.com", label)).is_err());
        let label = "a".repeat(63);
        assert!(DomainName::parse(&format!("{}.com", label)).is_ok());
    }

    #[test]
    fn test_parse_rejects_long_name() {
        let name = vec!["abcdefghij"; 26].join(".");
        assert!(name.len() > 253);
        assert!(DomainName::parse(&name).is_err());
    }

    #[test]
    fn test_parse_rejects_inner_whitespace() {
        assert!(DomainName::parse("exa mple.com").is_err());
    }

    #[test]
    fn test_clone_shares_storage() {
        let a = DomainName::parse("example.com").unwrap();
        let b = a.clone();
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }
}
