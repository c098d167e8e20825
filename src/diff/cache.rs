//! Bounded FIFO memo of line diffs keyed by content fingerprint.
//!
//! Fingerprints can collide, in which case a stale diff is returned. That only ever costs a
//! cosmetic glitch in the rendered diff and saves re-running the LCS table on every frame of a
//! streamed response.

use std::collections::{HashMap, VecDeque};

use crate::core::hash::Fingerprint;

use super::ops::DiffOp;

pub const DEFAULT_DIFF_CACHE_CAPACITY: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct DiffCache {
    capacity: usize,
    order: VecDeque<Fingerprint>,
    entries: HashMap<Fingerprint, Vec<DiffOp>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for DiffCache {
    fn default() -> Self {
        Self::new(DEFAULT_DIFF_CACHE_CAPACITY)
    }
}

impl DiffCache {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: &Fingerprint) -> Option<&[DiffOp]> {
        match self.entries.get(key) {
            Some(ops) => {
                self.hits += 1;
                tracing::trace!(hits = self.hits, "diff cache hit");
                Some(ops.as_slice())
            }
            None => {
                self.misses += 1;
                tracing::trace!(misses = self.misses, "diff cache miss");
                None
            }
        }
    }

    /// Inserts `ops`, dropping the oldest-inserted entry when full. Lookups never refresh an
    /// entry's position.
    pub fn insert(&mut self, key: Fingerprint, ops: Vec<DiffOp>) {
        if self.entries.insert(key, ops).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.evictions += 1;
                tracing::trace!(evictions = self.evictions, "diff cache evicted oldest entry");
            }
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.len(),
        }
    }
}
