//! URL handling module for Hostmap
//!
//! This module decides which links belong to the crawl and turns the ones
//! that do into a single canonical absolute form, so that the ledger can
//! compare URLs as plain strings.

mod fragment;
mod scope;

pub use fragment::FragmentStripper;
pub use scope::CrawlScope;
