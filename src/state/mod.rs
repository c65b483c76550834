//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: the terminal result recorded for a page
//! - `Visit`: a ledger entry, either claimed (in flight) or done
//! - `Ledger`: the shared, lock-protected record of every URL the run has touched

mod ledger;
mod page_state;

// Re-export main types
pub use ledger::Ledger;
pub use page_state::{PageOutcome, Visit};
