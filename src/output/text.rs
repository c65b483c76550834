//! Plain-text site map
//!
//! ```text
//!
//! http://example.com/
//! -- http://example.com/about
//! -- http://example.com/logo.png
//!
//! http://example.com/logo.png
//! -- non-html
//! ```

use crate::output::CrawlReport;
use crate::state::PageOutcome;
use std::io::{self, Write};

/// Prefix of every line under a page
const ITEM_PREFIX: &str = "-- ";

/// Writes one block per visited page, sorted by URL
pub fn write_text<W: Write>(report: &CrawlReport, out: &mut W) -> io::Result<()> {
    for (url, outcome) in &report.pages {
        writeln!(out)?;
        writeln!(out, "{}", url)?;

        match outcome {
            PageOutcome::Linked { links } => {
                for link in links {
                    writeln!(out, "{}{}", ITEM_PREFIX, link)?;
                }
            }
            PageOutcome::NonHtml { .. } | PageOutcome::Error { .. } => {
                writeln!(out, "{}{}", ITEM_PREFIX, outcome.label())?;
            }
        }
    }
    Ok(())
}
