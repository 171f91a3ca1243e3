//! In-run accumulator for newly discovered links and the end-of-run merge
//!
//! Links found during a run are buffered here instead of being pushed onto the
//! live pending list, so the run's remaining iterations work through the queue
//! as it stood at start. The buffer is folded into the pending queue once, at
//! finalization.

use crate::frontier::{PendingQueue, VisitedSet};
use crate::url::{canonicalize, CanonicalUrl};
use std::collections::HashSet;

/// Ordered, deduplicated buffer of canonical URLs discovered during a run
#[derive(Debug, Clone, Default)]
pub struct DiscoveryBuffer {
    order: Vec<CanonicalUrl>,
    seen: HashSet<CanonicalUrl>,
}

impl DiscoveryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` unless it is already visited or already buffered
    ///
    /// Returns true if the URL was appended.
    pub fn offer(&mut self, url: CanonicalUrl, visited: &VisitedSet) -> bool {
        if visited.contains(&url) || self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.order.push(url);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalUrl> {
        self.order.iter()
    }

    pub fn into_vec(self) -> Vec<CanonicalUrl> {
        self.order
    }
}

/// Builds the pending queue to persist at the end of a run
///
/// The remaining queued items come first, then the discovered links, in
/// first-seen order. An entry is kept only if its canonical form is neither
/// visited nor already kept. Remaining items keep their raw spelling; entries
/// that cannot be canonicalized are dropped.
pub fn merge_pending(
    remaining: PendingQueue,
    discovered: DiscoveryBuffer,
    visited: &VisitedSet,
) -> PendingQueue {
    let mut seen: HashSet<CanonicalUrl> = HashSet::new();
    let mut merged = PendingQueue::with_capacity(remaining.len() + discovered.len());

    let candidates = remaining
        .into_iter()
        .chain(discovered.into_vec().into_iter().map(CanonicalUrl::into_string));

    for raw in candidates {
        let key = match canonicalize(&raw) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!("Dropping unusable pending entry {}: {}", raw, e);
                continue;
            }
        };

        if visited.contains(&key) || !seen.insert(key) {
            continue;
        }
        merged.push_back(raw);
    }

    merged
}
