use crate::config::types::CrawlConfig;
use crate::ConfigError;
use url::Url;

/// Upper bound on simultaneous fetch slots
const MAX_FETCH_SLOTS: u32 = 1024;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_root_url(&config.root_url)?;
    validate_fetch_settings(config)?;
    validate_skip_extensions(&config.skip_extensions)?;
    Ok(())
}

/// Validates the root URL: present, http(s), with a host
fn validate_root_url(root_url: &str) -> Result<(), ConfigError> {
    if root_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "root_url must be given on the command line or in the config file".to_string(),
        ));
    }

    let url = Url::parse(root_url.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root URL '{}': {}", root_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Root URL '{}' must use http or https, got {}",
            root_url,
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Root URL '{}' has no host",
            root_url
        )));
    }

    Ok(())
}

/// Validates client and concurrency settings
fn validate_fetch_settings(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_FETCH_SLOTS {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_FETCH_SLOTS, config.max_concurrent_fetches
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values may not carry control characters
    if config.user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: {:?}",
            config.user_agent
        )));
    }

    Ok(())
}

/// Validates the extension filter list
fn validate_skip_extensions(extensions: &[String]) -> Result<(), ConfigError> {
    for ext in extensions {
        let trimmed = ext.trim_start_matches('.');
        if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains('.') {
            return Err(ConfigError::Validation(format!(
                "skip_extensions entry '{}' must be a bare suffix such as \"png\"",
                ext
            )));
        }
    }
    Ok(())
}
