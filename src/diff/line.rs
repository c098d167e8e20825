//! Line-level diff engine with a memo cache owned by the instance.

use crate::core::hash::Fingerprint;

use super::cache::{CacheStats, DiffCache};
use super::lcs::{edit_script, Step};
use super::ops::DiffOp;

/// Uncached line diff.
///
/// `Context` + `Add` lines reproduce `new` and `Context` + `Remove` lines reproduce `old`.
pub fn diff_lines<S: AsRef<str>>(old: &[S], new: &[S]) -> Vec<DiffOp> {
    let old: Vec<&str> = old.iter().map(|line| line.as_ref()).collect();
    let new: Vec<&str> = new.iter().map(|line| line.as_ref()).collect();

    edit_script(&old, &new)
        .into_iter()
        .map(|step| match step {
            Step::Keep { new: idx, .. } => DiffOp::context(new[idx]),
            Step::Delete(idx) => DiffOp::remove(old[idx]),
            Step::Insert(idx) => DiffOp::add(new[idx]),
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct LineDiffEngine {
    cache: DiffCache,
}

impl LineDiffEngine {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: DiffCache::new(cache_capacity),
        }
    }

    pub fn diff<S: AsRef<str>>(&mut self, old: &[S], new: &[S]) -> Vec<DiffOp> {
        let key = Fingerprint::of(old, new);
        if let Some(ops) = self.cache.get(&key) {
            return ops.to_vec();
        }
        let ops = diff_lines(old, new);
        self.cache.insert(key, ops.clone());
        ops
    }

    /// Splits both sides on `\n` before diffing.
    pub fn diff_text(&mut self, old: &str, new: &str) -> Vec<DiffOp> {
        let old_lines = text_lines(old);
        let new_lines = text_lines(new);
        self.diff(&old_lines, &new_lines)
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Empty text is zero lines rather than one empty line.
pub fn text_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
