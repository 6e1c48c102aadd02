//! Decision cache for repeated `(email, path)` queries
//!
//! One cache belongs to one policy snapshot, so a reload discards every
//! cached decision together with the policies that produced it.
//!
//! Entries are keyed by a hash of the query. The entry keeps the query it
//! answers, and a lookup only hits when that stored query is equal to the
//! one being asked. A hash collision is therefore a miss, never a borrowed
//! decision. Looking up an entry does not allocate.

use ahash::RandomState;
use lru::LruCache;
use std::num::NonZeroUsize;

/// One remembered decision
struct Decision {
    email: Box<str>,
    path: Box<str>,
    allowed: bool,
}

impl Decision {
    fn answers(&self, email: &str, path: &str) -> bool {
        &*self.email == email && &*self.path == path
    }
}

/// Bounded LRU of authorization decisions
pub struct DecisionCache {
    entries: LruCache<u64, Decision>,
    hasher: RandomState,
}

impl DecisionCache {
    /// Create a cache holding up to `capacity` decisions
    ///
    /// Returns `None` for a zero capacity, meaning caching is disabled.
    pub fn new(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(|capacity| DecisionCache {
            entries: LruCache::new(capacity),
            hasher: RandomState::new(),
        })
    }

    fn slot(&self, email: &str, path: &str) -> u64 {
        self.hasher.hash_one((email, path))
    }

    /// Previously stored decision for this exact query, if still cached
    pub fn get(&mut self, email: &str, path: &str) -> Option<bool> {
        let slot = self.slot(email, path);
        self.get_in_slot(slot, email, path)
    }

    /// Remember a decision, replacing whatever shared its slot
    pub fn put(&mut self, email: &str, path: &str, allowed: bool) {
        let slot = self.slot(email, path);
        self.put_in_slot(slot, email, path, allowed);
    }

    fn get_in_slot(&mut self, slot: u64, email: &str, path: &str) -> Option<bool> {
        match self.entries.get(&slot) {
            Some(decision) if decision.answers(email, path) => Some(decision.allowed),
            _ => None,
        }
    }

    fn put_in_slot(&mut self, slot: u64, email: &str, path: &str, allowed: bool) {
        if let Some(decision) = self.entries.get_mut(&slot) {
            if decision.answers(email, path) {
                decision.allowed = allowed;
                return;
            }
        }
        self.entries.put(
            slot,
            Decision {
                email: email.into(),
                path: path.into(),
                allowed,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}
