//! Hostmap main entry point
//!
//! This is the command-line interface for the Hostmap site mapper.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use hostmap::config::{load_config, CrawlConfig, ProbeMode};
use hostmap::crawler::crawl;
use hostmap::output::{write_report, write_statistics, ReportFormat};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hostmap: a single-host site mapper
///
/// Crawls every page reachable from ROOT_URL through links on the same host
/// and prints each visited page with the links it contains.
#[derive(Parser, Debug)]
#[command(name = "hostmap")]
#[command(version)]
#[command(about = "A single-host site mapper", long_about = None)]
struct Cli {
    /// URL to start crawling from (overrides `root-url` in the config file)
    #[arg(value_name = "ROOT_URL")]
    root_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Maximum number of pages fetched at the same time
    #[arg(short = 'j', long, value_name = "N")]
    max_concurrent_fetches: Option<u32>,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Connect timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// How to tell whether a page is HTML
    #[arg(long, value_enum)]
    probe: Option<ProbeArg>,

    /// Also follow document-relative links such as `page.html`
    #[arg(long)]
    follow_relative: bool,

    /// Path suffixes never to fetch, e.g. `--skip-ext png,jpg`
    #[arg(long = "skip-ext", value_delimiter = ',', value_name = "EXT")]
    skip_extensions: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print crawl statistics to stderr after the report
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProbeArg {
    /// HEAD request first, GET only for HTML
    Head,
    /// Single GET, body read only for HTML
    Inline,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let report = match crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed to start: {}", e);
            return Err(e.into());
        }
    };

    let format = match cli.format {
        FormatArg::Text => ReportFormat::Text,
        FormatArg::Json => ReportFormat::Json,
    };

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_report(&report, format, &mut BufWriter::new(file))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            write_report(&report, format, &mut stdout.lock())?;
        }
    }

    if cli.stats {
        write_statistics(&report.statistics(), &mut io::stderr().lock())?;
    }

    Ok(())
}

/// Merges the config file (if any) with command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => CrawlConfig::default(),
    };

    if let Some(root_url) = &cli.root_url {
        config.root_url = root_url.clone();
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(n) = cli.max_concurrent_fetches {
        config.max_concurrent_fetches = n;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = secs;
    }
    if let Some(secs) = cli.connect_timeout {
        config.connect_timeout_secs = secs;
    }
    if let Some(probe) = cli.probe {
        config.probe = match probe {
            ProbeArg::Head => ProbeMode::Head,
            ProbeArg::Inline => ProbeMode::Inline,
        };
    }
    if cli.follow_relative {
        config.follow_relative_links = true;
    }
    if !cli.skip_extensions.is_empty() {
        config.skip_extensions = cli.skip_extensions.clone();
    }

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hostmap=info,warn"),
            1 => EnvFilter::new("hostmap=debug,info"),
            2 => EnvFilter::new("hostmap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
