//! The visitation ledger
//!
//! One map from normalized URL to [`Visit`], behind one mutex for the whole
//! run. Every operation takes the lock for a single map access and releases
//! it before returning, so it is never held across a network call.

use crate::state::{PageOutcome, Visit};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared record of which URLs have been claimed and how they ended
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Mutex<HashMap<String, Visit>>,
}

impl Ledger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL for the calling task
    ///
    /// Checks for the URL and inserts it as [`Visit::Claimed`] under one lock
    /// acquisition. Returns `true` if the caller now owns the URL, `false` if
    /// any task already claimed or finished it. Only the first of any number
    /// of concurrent callers for the same URL wins.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(url) {
            return false;
        }
        entries.insert(url.to_string(), Visit::Claimed);
        true
    }

    /// Records the terminal outcome of a claimed URL
    ///
    /// The URL is expected to be in the claimed state. A terminal entry is
    /// never overwritten: a second record for the same URL is ignored and
    /// logged.
    pub fn record(&self, url: &str, outcome: PageOutcome) {
        let mut entries = self.lock();
        match entries.get(url) {
            Some(Visit::Done(existing)) => {
                tracing::warn!(
                    "Ignoring {} outcome for {}: already recorded as {}",
                    outcome,
                    url,
                    existing
                );
            }
            Some(Visit::Claimed) => {
                entries.insert(url.to_string(), Visit::Done(outcome));
            }
            None => {
                tracing::warn!("Recording {} outcome for unclaimed URL {}", outcome, url);
                entries.insert(url.to_string(), Visit::Done(outcome));
            }
        }
    }

    /// Returns a copy of the whole ledger
    ///
    /// Entries may still be [`Visit::Claimed`] while a run is in progress;
    /// the snapshot is only complete once the run has finished.
    pub fn snapshot(&self) -> HashMap<String, Visit> {
        self.lock().clone()
    }

    /// Returns the terminal outcomes, sorted by URL
    ///
    /// Claimed-but-unfinished entries are left out.
    pub fn outcomes(&self) -> BTreeMap<String, PageOutcome> {
        self.lock()
            .iter()
            .filter_map(|(url, visit)| match visit {
                Visit::Done(outcome) => Some((url.clone(), outcome.clone())),
                Visit::Claimed => {
                    tracing::warn!("URL {} was claimed but never finished", url);
                    None
                }
            })
            .collect()
    }

    /// Number of URLs claimed so far, finished or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no URL has been claimed
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Visit>> {
        // Every mutation is a single insert, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
