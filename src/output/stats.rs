//! Statistics for a finished crawl
//!
//! This module provides summary counts over a crawl report and a
//! formatted printout of them.

use crate::output::CrawlReport;
use crate::state::PageOutcome;
use std::io::{self, Write};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of pages visited
    pub total_pages: usize,

    /// Pages fetched and parsed for links
    pub linked_pages: usize,

    /// Pages skipped because they were not HTML
    pub non_html_pages: usize,

    /// Pages whose fetch failed
    pub error_pages: usize,

    /// Sum of link-set sizes over all linked pages
    pub total_links: usize,

    /// Wall-clock duration of the run
    pub elapsed_millis: i64,
}

impl CrawlStatistics {
    /// Computes statistics from a report
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut stats = Self {
            total_pages: report.pages.len(),
            elapsed_millis: report.elapsed_millis(),
            ..Self::default()
        };

        for outcome in report.pages.values() {
            match outcome {
                PageOutcome::Linked { links } => {
                    stats.linked_pages += 1;
                    stats.total_links += links.len();
                }
                PageOutcome::NonHtml { .. } => stats.non_html_pages += 1,
                PageOutcome::Error { .. } => stats.error_pages += 1,
            }
        }

        stats
    }

    /// Percentage of visited pages that were parsed
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.linked_pages as f64 / self.total_pages as f64) * 100.0
    }
}

/// Writes statistics in a formatted manner
pub fn write_statistics<W: Write>(stats: &CrawlStatistics, out: &mut W) -> io::Result<()> {
    writeln!(out, "=== Crawl Statistics ===")?;
    writeln!(out, "  Pages visited: {}", stats.total_pages)?;
    writeln!(out, "  Linked: {}", stats.linked_pages)?;
    writeln!(out, "  Non-HTML: {}", stats.non_html_pages)?;
    writeln!(out, "  Errors: {}", stats.error_pages)?;
    writeln!(out, "  Links found: {}", stats.total_links)?;
    writeln!(
        out,
        "  Duration: {:.2}s",
        stats.elapsed_millis as f64 / 1000.0
    )?;
    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages parsed)",
        stats.success_rate(),
        stats.linked_pages,
        stats.total_pages
    )?;
    Ok(())
}
