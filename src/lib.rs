//! Streaming diff and incremental markdown render engine for coding-agent transcripts.
//!
//! Invariant: whatever is shown while a message streams is superseded by
//! `MessageRenderer::finalize(..)`, which is always equal to a single non-incremental render of
//! the complete text.
//!
//! # Public API Overview
//! - Render live frames and the final markup via [`MessageRenderer`].
//! - Extract proposed file edits with [`EditBlockParser`] and attach host outcomes with
//!   [`apply_outcomes`].
//! - Diff lines with [`LineDiffEngine`] (memoized) and refine paired lines with
//!   [`CharDiffRefiner`].
//! - Plug in a different markdown primitive through [`MarkdownParser`].
//!
//! Everything is synchronous and single-threaded; engine instances own their caches, so
//! separate sessions never share state.

#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod diff;
pub mod render;

/// Configuration.
pub use crate::config::{ConfigError, EngineConfig, SplitPolicy};
pub use crate::error::RenderError;

/// Edit-block protocol and parse results.
pub use crate::core::edit_block::{
    apply_outcomes, ApplyOutcome, EditBlock, EditBlockParser, EditStatus, Markers,
    ParsedMessage, PendingEdit, Segment, CLOSE_MARKER, OPEN_MARKER, SEPARATOR_MARKER,
};

/// Line and word-level diffing.
pub use crate::diff::{
    diff_lines, CacheStats, CharDiffRefiner, CharSegment, DiffKind, DiffOp, LineDiffEngine,
    SegmentKind,
};

/// Rendering.
pub use crate::render::{
    DiffBlockRenderer, DiffStats, GfmMarkdown, IncrementalMarkdownRenderer, MarkdownParser,
    MessageRenderer, NavigationEvent, RenderState,
};

/// Word/space/punctuation run splitting.
pub use crate::core::text::segment::{segment_line, RunKind, TextRun};
