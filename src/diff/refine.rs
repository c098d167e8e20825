//! Word-level refinement of adjacent remove/add line pairs.

use crate::core::text::segment::segment_line;

use super::lcs::{edit_script, Step};
use super::ops::{CharSegment, DiffOp, SegmentKind};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Dice coefficient `2·common / (old + new)`. Two empty sequences are identical.
pub fn dice_similarity(common: usize, old_len: usize, new_len: usize) -> f64 {
    let total = old_len + new_len;
    if total == 0 {
        return 1.0;
    }
    (2 * common) as f64 / total as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefinedPair {
    pub similarity: f64,
    pub old: Vec<CharSegment>,
    pub new: Vec<CharSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharDiffRefiner {
    threshold: f64,
}

impl Default for CharDiffRefiner {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl CharDiffRefiner {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn similarity(&self, old: &str, new: &str) -> f64 {
        let old_tokens = tokens(old);
        let new_tokens = tokens(new);
        let common = edit_script(&old_tokens, &new_tokens)
            .iter()
            .filter(|step| matches!(step, Step::Keep { .. }))
            .count();
        dice_similarity(common, old_tokens.len(), new_tokens.len())
    }

    /// Word-level segments for both sides when the lines are similar enough (strictly above
    /// the threshold) to read as one edited line.
    pub fn pair(&self, old: &str, new: &str) -> Option<RefinedPair> {
        let old_tokens = tokens(old);
        let new_tokens = tokens(new);
        let script = edit_script(&old_tokens, &new_tokens);
        let common = script
            .iter()
            .filter(|step| matches!(step, Step::Keep { .. }))
            .count();
        let similarity = dice_similarity(common, old_tokens.len(), new_tokens.len());
        if similarity <= self.threshold {
            return None;
        }

        let mut old_segments = Vec::new();
        let mut new_segments = Vec::new();
        for step in script {
            match step {
                Step::Keep { old: idx, .. } => {
                    push_merged(&mut old_segments, SegmentKind::Same, old_tokens[idx]);
                    push_merged(&mut new_segments, SegmentKind::Same, old_tokens[idx]);
                }
                Step::Delete(idx) => {
                    push_merged(&mut old_segments, SegmentKind::Remove, old_tokens[idx]);
                }
                Step::Insert(idx) => {
                    push_merged(&mut new_segments, SegmentKind::Add, new_tokens[idx]);
                }
            }
        }

        Some(RefinedPair {
            similarity,
            old: old_segments,
            new: new_segments,
        })
    }

    /// Fills in segments for every remove immediately followed by an add. Each op is looked at
    /// once; removes further up a change run are left unpaired.
    pub fn refine(&self, ops: &mut [DiffOp]) {
        let mut idx = 0;
        while idx + 1 < ops.len() {
            let adjacent = matches!(
                (&ops[idx], &ops[idx + 1]),
                (DiffOp::Remove { .. }, DiffOp::Add { .. })
            );
            if adjacent {
                if let Some(pair) = self.pair(ops[idx].text(), ops[idx + 1].text()) {
                    ops[idx].set_segments(pair.old);
                    ops[idx + 1].set_segments(pair.new);
                    idx += 2;
                    continue;
                }
            }
            idx += 1;
        }
    }
}

fn tokens(line: &str) -> Vec<&str> {
    segment_line(line).into_iter().map(|run| run.text).collect()
}

fn push_merged(segments: &mut Vec<CharSegment>, kind: SegmentKind, text: &str) {
    match segments.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => segments.push(CharSegment::new(kind, text)),
    }
}
