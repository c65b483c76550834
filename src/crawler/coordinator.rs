//! Crawler coordinator - main crawl orchestration logic
//!
//! Every discovered URL gets its own tokio task. A task:
//! 1. Claims its URL in the ledger, or stops if another task got there first
//! 2. Waits for a fetch slot and fetches the page (HEAD probe, then GET)
//! 3. Records `error` or `non-html` and stops, or
//! 4. Extracts and scopes the page's links, records them, and spawns one
//!    task per link
//!
//! The run ends when the in-flight tracker reaches zero. Per-page failures
//! never leave the task that hit them.

use crate::config::{validate, CrawlConfig, ProbeMode};
use crate::crawler::parser::{extract_page_links, LinkFilter};
use crate::crawler::tracker::{InFlight, TaskGuard};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::CrawlReport;
use crate::state::{Ledger, PageOutcome};
use crate::url::CrawlScope;
use crate::CrawlError;
use chrono::Utc;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Progress is logged every this many finished pages
const PROGRESS_INTERVAL: usize = 50;

/// Main crawler coordinator structure
pub struct Coordinator {
    shared: Arc<Shared>,
}

/// State every crawl task reads
struct Shared {
    scope: CrawlScope,
    ledger: Ledger,
    client: Client,
    fetch_slots: Semaphore,
    filter: LinkFilter,
    probe: ProbeMode,
    in_flight: Arc<InFlight>,
    pages_finished: AtomicUsize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// All fallible setup happens here: config validation, root URL
    /// parsing, fragment pattern compilation and HTTP client construction.
    /// Once this returns `Ok`, [`Coordinator::run`] cannot fail.
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        validate(&config)?;

        let scope = CrawlScope::new(&config.root_url)?
            .with_relative_links(config.follow_relative_links);
        let client = build_http_client(&config)?;

        tracing::debug!(
            "Scope host {} via {}, {} fetch slots, {:?} probe",
            scope.host(),
            scope.scheme(),
            config.max_concurrent_fetches,
            config.probe
        );

        Ok(Self {
            shared: Arc::new(Shared {
                scope,
                ledger: Ledger::new(),
                client,
                fetch_slots: Semaphore::new(config.max_concurrent_fetches as usize),
                filter: LinkFilter::new(&config.skip_extensions),
                probe: config.probe,
                in_flight: InFlight::new(),
                pages_finished: AtomicUsize::new(0),
            }),
        })
    }

    /// The normalized root URL the run starts from
    pub fn root(&self) -> &str {
        self.shared.scope.root()
    }

    /// The visitation ledger of this run
    pub fn ledger(&self) -> &Ledger {
        &self.shared.ledger
    }

    /// Runs the crawl to completion
    ///
    /// Seeds the root URL, then waits until no task is outstanding. There is
    /// no timeout and no cancellation: a finite site always finishes because
    /// every spawn that does real work corresponds to a URL winning its one
    /// claim.
    pub async fn run(self) -> CrawlReport {
        let started_at = Utc::now();
        let root = self.root().to_string();
        tracing::info!("Starting crawl of {}", root);

        spawn_crawl(&self.shared, root.clone());
        self.shared.in_flight.wait_idle().await;

        let finished_at = Utc::now();
        let pages = self.shared.ledger.outcomes();
        tracing::info!(
            "Crawl completed: {} pages in {}ms",
            pages.len(),
            (finished_at - started_at).num_milliseconds()
        );

        CrawlReport {
            root,
            started_at,
            finished_at,
            pages,
        }
    }
}

/// Registers a task for `url` and spawns it
///
/// The guard is taken before the spawn, so the caller's own guard can never
/// be the last one released while this child is pending.
fn spawn_crawl(shared: &Arc<Shared>, url: String) {
    let guard = shared.in_flight.enter();
    let shared = Arc::clone(shared);
    tokio::spawn(crawl_page(shared, url, guard));
}

/// Processes a single URL
async fn crawl_page(shared: Arc<Shared>, url: String, guard: TaskGuard) {
    let _guard = guard;

    if !shared.ledger.try_claim(&url) {
        tracing::trace!("Skipping {}: already claimed", url);
        return;
    }
    tracing::trace!("Claimed {}", url);

    let fetch_result = {
        let _permit = match shared.fetch_slots.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                shared.finish(
                    &url,
                    PageOutcome::Error {
                        reason: format!("No fetch slot: {}", e),
                    },
                );
                return;
            }
        };
        fetch_url(&shared.client, &url, shared.probe).await
    };

    match fetch_result {
        FetchResult::Html { status_code, body } => {
            let links = extract_page_links(&body, &url, &shared.scope, &shared.filter);
            tracing::debug!(
                "Found {} links on {} (HTTP {})",
                links.len(),
                url,
                status_code
            );

            // Record before spawning so the page is terminal before its children run
            let children: Vec<String> = links.iter().cloned().collect();
            shared.finish(&url, PageOutcome::Linked { links });

            for child in children {
                spawn_crawl(&shared, child);
            }
        }

        FetchResult::ContentMismatch { content_type } => {
            tracing::debug!("Skipping non-HTML page {} ({})", url, content_type);
            shared.finish(&url, PageOutcome::NonHtml { content_type });
        }

        FetchResult::NetworkError { error } => {
            tracing::warn!("Error fetching {}: {}", url, error);
            shared.finish(&url, PageOutcome::Error { reason: error });
        }
    }
}

impl Shared {
    /// Records a terminal outcome and reports progress
    fn finish(&self, url: &str, outcome: PageOutcome) {
        self.ledger.record(url, outcome);

        let finished = self.pages_finished.fetch_add(1, Ordering::Relaxed) + 1;
        if finished % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages finished, {} URLs claimed, {} tasks in flight",
                finished,
                self.ledger.len(),
                self.in_flight.outstanding()
            );
        }
    }
}

/// Runs a complete crawl operation
///
/// # Example
///
/// ```no_run
/// use hostmap::config::CrawlConfig;
/// use hostmap::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(CrawlConfig::new("https://example.com/")).await?;
/// for (url, outcome) in &report.pages {
///     println!("{} {}", url, outcome);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfig) -> Result<CrawlReport, CrawlError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
