use serde::Deserialize;

/// Main configuration structure for a crawl run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlConfig {
    /// Root URL the crawl starts from; its host bounds the crawl
    #[serde(default)]
    pub root_url: String,

    /// Value sent in the User-Agent header of every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of pages being fetched at the same time
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout in seconds (0 disables it)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds (0 disables it)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// How a page is determined to be HTML before its body is read
    #[serde(default)]
    pub probe: ProbeMode,

    /// Resolve document-relative hrefs (`page.html`, `../x`) against the
    /// page they appear on instead of dropping them
    #[serde(default)]
    pub follow_relative_links: bool,

    /// Path suffixes (without the dot) whose links are never followed
    #[serde(default)]
    pub skip_extensions: Vec<String>,
}

/// Content-type detection strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeMode {
    /// Send a HEAD request first, GET only if the page is HTML
    #[default]
    Head,
    /// Send a single GET and read its Content-Type before the body
    Inline,
}

impl CrawlConfig {
    /// Creates a configuration with defaults for the given root URL
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            ..Self::default()
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: String::new(),
            user_agent: default_user_agent(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            probe: ProbeMode::default(),
            follow_relative_links: false,
            skip_extensions: Vec::new(),
        }
    }
}

/// The identifying client name, `hostmap/<version>`
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_max_concurrent_fetches() -> u32 {
    16
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
