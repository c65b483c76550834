//! Page state definitions for tracking crawl progress
//!
//! A URL that is absent from the ledger is unclaimed. Once claimed it moves
//! exactly once to one of the terminal outcomes below.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Terminal result of processing one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PageOutcome {
    /// Page was HTML; holds the normalized in-scope links found on it
    Linked { links: BTreeSet<String> },

    /// Content-Type was not `text/html`; the body was not parsed
    NonHtml { content_type: String },

    /// Request construction or transport failed
    Error { reason: String },
}

impl PageOutcome {
    /// The discovered links, `None` for non-linked outcomes
    pub fn links(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Linked { links } => Some(links),
            Self::NonHtml { .. } | Self::Error { .. } => None,
        }
    }

    /// Returns true if the page was fetched and parsed
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked { .. })
    }

    /// Returns true if the page failed to fetch
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Short status label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Linked { .. } => "linked",
            Self::NonHtml { .. } => "non-html",
            Self::Error { .. } => "error",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// A task owns this URL and has not finished it yet
    Claimed,

    /// The URL reached a terminal outcome
    Done(PageOutcome),
}

impl Visit {
    /// Returns true once the entry can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// The terminal outcome, if any
    pub fn outcome(&self) -> Option<&PageOutcome> {
        match self {
            Self::Claimed => None,
            Self::Done(outcome) => Some(outcome),
        }
    }
}
