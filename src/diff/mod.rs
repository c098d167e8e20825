//! Line and word-level diffing.

pub mod cache;
pub mod lcs;
pub mod line;
pub mod ops;
pub mod refine;

pub use cache::{CacheStats, DiffCache};
pub use line::{diff_lines, LineDiffEngine};
pub use ops::{CharSegment, DiffKind, DiffOp, SegmentKind};
pub use refine::{dice_similarity, CharDiffRefiner, RefinedPair};
