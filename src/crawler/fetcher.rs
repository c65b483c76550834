//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the identifying user agent
//! - HEAD requests to check Content-Type before downloading
//! - GET requests to fetch page content
//! - Classifying transport failures
//!
//! Status codes are not interpreted: an HTML error page is
//! parsed like any other page. Only transport failures become errors.

use crate::config::{CrawlConfig, ProbeMode};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use std::time::Duration;

/// Content types parsed for links
const HTML_CONTENT_TYPE: &str = "text/html";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The page is HTML and its body was downloaded
    Html {
        /// HTTP status code of the GET
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received, empty if absent
        content_type: String,
    },

    /// Request could not be built or sent, or the body could not be read
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Every request made with this client carries the configured user agent.
///
/// # Example
///
/// ```no_run
/// use hostmap::config::CrawlConfig;
/// use hostmap::crawler::build_http_client;
///
/// let config = CrawlConfig::new("https://example.com/");
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    if config.request_timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
    }
    if config.connect_timeout_secs > 0 {
        builder = builder.connect_timeout(Duration::from_secs(config.connect_timeout_secs));
    }

    builder.build()
}

/// Fetches a URL, downloading the body only if it is HTML
///
/// # Request Flow
///
/// | Probe mode | Requests |
/// |------------|----------|
/// | `Head` | HEAD; if HTML, GET |
/// | `Inline` | GET; body read only if the GET's Content-Type is HTML |
///
/// In both modes at most one body is downloaded per page.
pub async fn fetch_url(client: &Client, url: &str, probe: ProbeMode) -> FetchResult {
    if probe == ProbeMode::Head {
        match check_content_type(client, url).await {
            Ok(content_type) if is_html(&content_type) => {}
            Ok(content_type) => return FetchResult::ContentMismatch { content_type },
            Err(e) => {
                tracing::debug!("Error sending HEAD request to {}: {}", url, e);
                return network_error(&e);
            }
        }
    }

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Error sending GET request to {}: {}", url, e);
            return network_error(&e);
        }
    };

    let status_code = response.status().as_u16();
    if !response.status().is_success() {
        tracing::debug!("GET {} returned HTTP {}", url, status_code);
    }

    if probe == ProbeMode::Inline {
        let content_type = content_type_of(&response);
        if !is_html(&content_type) {
            return FetchResult::ContentMismatch { content_type };
        }
    }

    match response.text().await {
        Ok(body) => FetchResult::Html { status_code, body },
        Err(e) => {
            tracing::debug!("Error reading body of {}: {}", url, e);
            network_error(&e)
        }
    }
}

/// Sends a HEAD request and returns the Content-Type header value,
/// empty if the header is missing
async fn check_content_type(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    let response = client.head(url).send().await?;
    Ok(content_type_of(&response))
}

/// Returns true if a Content-Type value denotes an HTML document
pub fn is_html(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with(HTML_CONTENT_TYPE)
}

fn content_type_of(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Classifies a reqwest error into a human-readable reason
fn network_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        format!("Request timeout: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_builder() {
        format!("Invalid request: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
