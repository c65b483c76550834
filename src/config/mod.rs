//! Configuration module for Hostmap
//!
//! A crawl needs nothing but a root URL; everything else has a default.
//! An optional TOML file can override those defaults, and command-line
//! flags override the file.
//!
//! # Example
//!
//! ```no_run
//! use hostmap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hostmap.toml")).unwrap();
//! println!("Fetch slots: {}", config.max_concurrent_fetches);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{default_user_agent, CrawlConfig, ProbeMode};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
