//! Per-file diff display for finalized and in-progress edit blocks.

use std::fmt::Write as _;

use crate::core::edit_block::{EditBlock, EditStatus, PendingEdit};
use crate::core::hash::Fingerprint;
use crate::core::text::utils::escape_html;
use crate::diff::line::text_lines;
use crate::diff::{CacheStats, CharDiffRefiner, DiffCache, DiffOp, LineDiffEngine, SegmentKind};

const WRITING: &str = "writing";
const DEFAULT_FAILURE: &str = "edit could not be applied";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    pub fn of(ops: &[DiffOp]) -> Self {
        let mut stats = Self::default();
        for op in ops {
            match op {
                DiffOp::Add { .. } => stats.added += 1,
                DiffOp::Remove { .. } => stats.removed += 1,
                DiffOp::Context(_) => {}
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiffBlockRenderer {
    engine: LineDiffEngine,
    refiner: CharDiffRefiner,
    /// Refined ops keyed like the line cache, so a repeat render skips both passes.
    refined: DiffCache,
}

impl DiffBlockRenderer {
    pub fn new(engine: LineDiffEngine, refiner: CharDiffRefiner) -> Self {
        let refined = DiffCache::new(engine.cache_capacity());
        Self {
            engine,
            refiner,
            refined,
        }
    }

    /// Stats of the refined-diff cache that serves every render.
    pub fn cache_stats(&self) -> CacheStats {
        self.refined.stats()
    }

    /// Stats of the underlying line cache, consulted only on a refined-cache miss.
    pub fn line_cache_stats(&self) -> CacheStats {
        self.engine.cache_stats()
    }

    /// Line diff of the block, with word-level segments on paired lines.
    pub fn diff(&mut self, block: &EditBlock) -> Vec<DiffOp> {
        let old = text_lines(&block.edit_lines);
        let new = text_lines(&block.repl_lines);
        let key = Fingerprint::of(&old, &new);
        if let Some(ops) = self.refined.get(&key) {
            return ops.to_vec();
        }

        let mut ops = self.engine.diff(&old, &new);
        self.refiner.refine(&mut ops);
        self.refined.insert(key, ops.clone());
        ops
    }

    pub fn render(&mut self, block: &EditBlock) -> String {
        let ops = self.diff(block);
        let stats = DiffStats::of(&ops);
        let status = block.status.as_str();

        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"edit-block edit-block--{status}\" data-path=\"{}\" data-status=\"{status}\"",
            escape_html(&block.file_path)
        );
        if let Some(line) = block.estimated_line {
            let _ = write!(out, " data-line=\"{line}\"");
        }
        if let Some(search) = block.search_context() {
            let _ = write!(out, " data-search=\"{}\"", escape_html(search));
        }
        out.push_str(">\n");

        push_header_open(&mut out, &block.file_path, status);
        if let Some(line) = block.estimated_line {
            let _ = write!(out, "<span class=\"edit-block__line\">L{line}</span>");
        }
        let _ = write!(
            out,
            "<span class=\"edit-block__stats\">+{} -{}</span></div>\n",
            stats.added, stats.removed
        );

        push_body(&mut out, &ops);

        if block.status == EditStatus::Failed {
            let reason = block.reason.as_deref().unwrap_or(DEFAULT_FAILURE);
            let _ = write!(
                out,
                "<div class=\"edit-block__error\">{}</div>\n",
                escape_html(reason)
            );
        }
        out.push_str("</div>\n");
        out
    }

    /// In-progress block. Content is still changing every frame, so only a linear
    /// prefix/suffix comparison is done here, never the LCS engine.
    pub fn render_pending(&self, pending: &PendingEdit) -> String {
        let ops = pending_ops(pending);

        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"edit-block edit-block--{WRITING}\" data-path=\"{}\" data-status=\"{WRITING}\">\n",
            escape_html(&pending.file_path)
        );
        push_header_open(&mut out, &pending.file_path, WRITING);
        out.push_str("</div>\n");
        push_body(&mut out, &ops);
        let _ = write!(
            out,
            "<div class=\"edit-block__writing\">{WRITING}\u{2026}</div>\n</div>\n"
        );
        out
    }
}

pub fn pending_ops(pending: &PendingEdit) -> Vec<DiffOp> {
    let search = text_lines(&pending.search);
    let Some(replacement) = pending.replacement.as_deref() else {
        return search.into_iter().map(DiffOp::context).collect();
    };
    let replacement = text_lines(replacement);

    let prefix = search
        .iter()
        .zip(replacement.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = search[prefix..]
        .iter()
        .rev()
        .zip(replacement[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut ops = Vec::with_capacity(search.len() + replacement.len());
    ops.extend(search[..prefix].iter().map(|line| DiffOp::context(*line)));
    ops.extend(
        search[prefix..search.len() - suffix]
            .iter()
            .map(|line| DiffOp::remove(*line)),
    );
    ops.extend(
        replacement[prefix..replacement.len() - suffix]
            .iter()
            .map(|line| DiffOp::add(*line)),
    );
    ops.extend(
        search[search.len() - suffix..]
            .iter()
            .map(|line| DiffOp::context(*line)),
    );
    ops
}

fn push_header_open(out: &mut String, path: &str, status: &str) {
    let _ = write!(
        out,
        "<div class=\"edit-block__header\"><span class=\"edit-block__path\">{}</span><span class=\"edit-block__status\">{status}</span>",
        escape_html(path)
    );
}

fn push_body(out: &mut String, ops: &[DiffOp]) {
    out.push_str("<pre class=\"edit-block__body\"><code>");
    for op in ops {
        let (class, sign) = match op {
            DiffOp::Context(_) => ("context", ' '),
            DiffOp::Add { .. } => ("add", '+'),
            DiffOp::Remove { .. } => ("remove", '-'),
        };
        let _ = write!(
            out,
            "<span class=\"diff-line diff-line--{class}\"><span class=\"diff-line__sign\">{sign}</span>"
        );
        match op.segments() {
            Some(segments) => {
                for segment in segments {
                    let text = escape_html(&segment.text);
                    match segment.kind {
                        SegmentKind::Same => out.push_str(&text),
                        SegmentKind::Add => {
                            let _ = write!(out, "<ins>{text}</ins>");
                        }
                        SegmentKind::Remove => {
                            let _ = write!(out, "<del>{text}</del>");
                        }
                    }
                }
            }
            None => out.push_str(&escape_html(op.text())),
        }
        out.push_str("</span>\n");
    }
    out.push_str("</code></pre>\n");
}
