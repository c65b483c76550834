//! Output module for crawl reports
//!
//! This module handles:
//! - The finished site map of a run (`CrawlReport`)
//! - Rendering it as plain text or JSON
//! - Summary statistics for a run

pub mod stats;
mod text;

pub use stats::{write_statistics, CrawlStatistics};
pub use text::write_text;

use crate::state::PageOutcome;
use crate::CrawlError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// The completed ledger of a crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Normalized root URL
    pub root: String,

    /// When the root task was spawned
    pub started_at: DateTime<Utc>,

    /// When the last task finished
    pub finished_at: DateTime<Utc>,

    /// Every visited URL and how it ended, sorted by URL
    pub pages: BTreeMap<String, PageOutcome>,
}

impl CrawlReport {
    /// Wall-clock duration of the run in milliseconds
    pub fn elapsed_millis(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Summary counts for this report
    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics::from_report(self)
    }
}

/// Report rendering formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One block per page: the URL, then `-- ` lines
    #[default]
    Text,
    /// The full report as pretty-printed JSON
    Json,
}

/// Writes a report in the requested format
pub fn write_report<W: Write>(
    report: &CrawlReport,
    format: ReportFormat,
    out: &mut W,
) -> Result<(), CrawlError> {
    match format {
        ReportFormat::Text => write_text(report, out)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
