//! Crawl frontier: the visited set and the pending queue
//!
//! The frontier is the crawler's whole knowledge of what has been fetched and
//! what remains. It is loaded once at the start of a run, mutated in memory
//! only by the engine, and written back once at the end of a successful run.

mod discovery;
mod store;

pub use discovery::{merge_pending, DiscoveryBuffer};
pub use store::{load_seeds, FrontierStore};

use crate::url::CanonicalUrl;
use std::collections::btree_set;
use std::collections::{BTreeSet, VecDeque};
use thiserror::Error;

/// Errors raised by frontier persistence; always fatal to the run
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for frontier operations
pub type FrontierResult<T> = Result<T, FrontierError>;

/// Set of canonical URLs that have been fetched or permanently gated
///
/// The set only grows: there is no removal operation. Iteration is in sorted
/// order, which is also the persisted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    urls: BTreeSet<CanonicalUrl>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited; returns true if it was not already present
    pub fn insert(&mut self, url: CanonicalUrl) -> bool {
        self.urls.insert(url)
    }

    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.urls.contains(url)
    }

    /// Looks up a canonical key given as a plain string
    pub fn contains_str(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns true if every URL in `other` is also in this set
    pub fn is_superset(&self, other: &VisitedSet) -> bool {
        self.urls.is_superset(&other.urls)
    }

    /// Iterates in sorted order
    pub fn iter(&self) -> btree_set::Iter<'_, CanonicalUrl> {
        self.urls.iter()
    }
}

impl FromIterator<CanonicalUrl> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = CanonicalUrl>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a VisitedSet {
    type Item = &'a CanonicalUrl;
    type IntoIter = btree_set::Iter<'a, CanonicalUrl>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.iter()
    }
}

/// Raw URLs awaiting fetch, in FIFO order
pub type PendingQueue = VecDeque<String>;

/// Visited set plus pending queue, as loaded from or saved to a `FrontierStore`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    pub visited: VisitedSet,
    pub pending: PendingQueue,
}

impl Frontier {
    pub fn new(visited: VisitedSet, pending: PendingQueue) -> Self {
        Self { visited, pending }
    }
}
