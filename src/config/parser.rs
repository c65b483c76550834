use crate::config::types::CrawlConfig;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The file is not validated here: the root URL may still come from the
/// command line. Call [`crate::config::validate`] once all overrides are in.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use hostmap::config::load_config;
///
/// let config = load_config(Path::new("hostmap.toml")).unwrap();
/// println!("Root: {}", config.root_url);
/// ```
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text
pub fn parse_config(content: &str) -> Result<CrawlConfig, ConfigError> {
    let config: CrawlConfig = toml::from_str(content)?;
    Ok(config)
}
