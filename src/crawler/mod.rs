//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a HEAD probe for the content type
//! - HTML parsing and link extraction
//! - In-flight task accounting for completion detection
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod tracker;

pub use coordinator::{crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, is_html, FetchResult};
pub use parser::{extract_links, extract_page_links, LinkFilter};
pub use tracker::{InFlight, TaskGuard};
