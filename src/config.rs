use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use url::Url;

/// Pages collected per crawl when the caller does not ask for a value.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Hard server-side ceiling on pages per crawl, regardless of the request.
pub const MAX_PAGES_CEILING: usize = 2000;

/// Crawl depth when the caller does not ask for a value.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Hard server-side ceiling on crawl depth, regardless of the request.
pub const MAX_DEPTH_CEILING: usize = 5;

/// Budgets for a single crawl invocation.
///
/// Immutable once the crawl begins; nothing here outlives the request that
/// created it.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Validated absolute URL the crawl starts from.
    pub start_url: Url,

    /// Maximum size of the found-URL set.
    pub max_pages: usize,

    /// Maximum traversal depth; pages at this depth are found but not fetched.
    pub max_depth: usize,
}

impl CrawlConfig {
    /// Build a config from caller-requested budgets, applying the defaults
    /// for absent or zero values and the hard server-side ceilings.
    pub fn clamped(start_url: Url, max_pages: Option<usize>, max_depth: Option<usize>) -> Self {
        let max_pages = max_pages
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_PAGES)
            .min(MAX_PAGES_CEILING);
        let max_depth = max_depth
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_DEPTH)
            .min(MAX_DEPTH_CEILING);

        Self {
            start_url,
            max_pages,
            max_depth,
        }
    }
}

/// Settings for the crawl service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// User-Agent header sent with every page fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pause between successive page fetches, in milliseconds.
    #[serde(default = "default_politeness_ms")]
    pub politeness_ms: u64,

    /// Per-request timeout for page fetches, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Length of the per-client quota window, in seconds.
    #[serde(default = "default_quota_window_secs")]
    pub quota_window_secs: u64,

    /// Crawl requests allowed per client within one quota window.
    #[serde(default = "default_quota_max_requests")]
    pub quota_max_requests: u64,

    /// reCAPTCHA secret; token verification is skipped when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recaptcha_secret: Option<String>,

    /// Extra exclusion patterns merged with the built-in list.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user_agent: default_user_agent(),
            politeness_ms: default_politeness_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            quota_window_secs: default_quota_window_secs(),
            quota_max_requests: default_quota_max_requests(),
            recaptcha_secret: None,
            exclude_patterns: Vec::new(),
        }
    }
}

impl ServerSettings {
    /// Load settings from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let settings: Self = serde_json::from_str(&contents)?;
        Ok(settings)
    }
}

/// Default bind host.
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default listen port.
fn default_port() -> u16 {
    8080
}

/// Default identifying User-Agent.
fn default_user_agent() -> String {
    format!("site-scan/{}", env!("CARGO_PKG_VERSION"))
}

/// Default politeness delay between page fetches.
fn default_politeness_ms() -> u64 {
    100
}

/// Default page fetch timeout.
fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Default quota window length.
fn default_quota_window_secs() -> u64 {
    3600
}

/// Default crawl requests allowed per quota window.
fn default_quota_max_requests() -> u64 {
    10
}
