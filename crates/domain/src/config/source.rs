use serde::{Deserialize, Serialize};

/// Domain list location.
///
/// A local `path` wins over `url` when both are set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Local CSV or plain-text domain list
    #[serde(default)]
    pub path: Option<String>,

    /// Zipped CSV domain list fetched over HTTP
    #[serde(default = "default_url")]
    pub url: Option<String>,

    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: default_url(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

fn default_url() -> Option<String> {
    Some("http://s3.amazonaws.com/alexa-static/top-1m.csv.zip".to_string())
}

fn default_download_timeout_secs() -> u64 {
    300
}
