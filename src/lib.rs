//! Hostmap: a single-host site mapper
//!
//! This crate crawls one website from a root URL, following only links that
//! stay on the root's host, and produces a map of every visited page to the
//! set of links it contains.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Hostmap operations
///
/// Only run initialization and report writing can fail with this type.
/// Per-page failures are absorbed into the visitation ledger instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid normalization pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Hostmap operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{crawl, Coordinator};
pub use output::CrawlReport;
pub use state::{Ledger, PageOutcome};
pub use url::CrawlScope;
