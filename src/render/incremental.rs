//! Safe-split incremental commit over a growing message.
//!
//! Each call scans only the uncommitted suffix. Text up to the last blank line that sits
//! outside any fence and outside any edit block is handed to the chunk renderer once and
//! never looked at again; the rest is returned as the tail for cheap re-rendering.

use crate::config::SplitPolicy;
use crate::core::edit_block::{EditBlockParser, LineClass, Markers};
use crate::error::RenderError;

/// Cross-call state for one streamed message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    pub committed_markup: String,
    /// Byte offset into the message; always at a line start outside any fence or edit block.
    pub committed_offset: usize,
    /// Whether the uncommitted tail, as of the last scan, ends inside a fence. The committed
    /// region itself never does.
    pub fence_open: bool,
    /// Whether the uncommitted tail, as of the last scan, ends inside an edit block.
    pub edit_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scan {
    split: Option<usize>,
    fence_open: bool,
    edit_open: bool,
}

#[derive(Debug, Clone)]
pub struct IncrementalMarkdownRenderer {
    state: RenderState,
    seen: String,
    classifier: EditBlockParser,
    policy: SplitPolicy,
}

impl Default for IncrementalMarkdownRenderer {
    fn default() -> Self {
        Self::new(Markers::default(), SplitPolicy::default())
    }
}

impl IncrementalMarkdownRenderer {
    pub fn new(markers: Markers, policy: SplitPolicy) -> Self {
        Self {
            state: RenderState::default(),
            seen: String::new(),
            classifier: EditBlockParser::new(markers),
            policy,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn committed_markup(&self) -> &str {
        &self.state.committed_markup
    }

    pub fn committed_offset(&self) -> usize {
        self.state.committed_offset
    }

    pub fn reset(&mut self) {
        self.state = RenderState::default();
        self.seen.clear();
    }

    /// Brings the state up to date with `text` and returns the uncommitted tail.
    ///
    /// A `text` that does not extend the previous snapshot starts a new message. If
    /// `render_chunk` fails the error is returned and the committed state is left as it was.
    pub fn advance<'t, F>(
        &mut self,
        text: &'t str,
        render_chunk: F,
    ) -> Result<&'t str, RenderError>
    where
        F: FnOnce(&str) -> Result<String, RenderError>,
    {
        if !text.starts_with(self.seen.as_str()) {
            tracing::debug!(
                previous_len = self.seen.len(),
                new_len = text.len(),
                "message no longer extends previous snapshot; resetting incremental state"
            );
            self.reset();
        }
        let seen_len = self.seen.len();
        self.seen.push_str(&text[seen_len..]);

        let offset = self.state.committed_offset;
        let scan = self.scan(&text[offset..]);
        self.state.fence_open = scan.fence_open;
        self.state.edit_open = scan.edit_open;

        if let Some(split) = scan.split.filter(|_| self.policy == SplitPolicy::LastBlankLine) {
            let chunk = &text[offset..offset + split];
            let markup = render_chunk(chunk)?;
            self.state.committed_markup.push_str(&markup);
            self.state.committed_offset = offset + split;
            tracing::debug!(
                committed_offset = self.state.committed_offset,
                chunk_len = chunk.len(),
                "committed markdown chunk"
            );
        }

        Ok(&text[self.state.committed_offset..])
    }

    /// Walks complete lines of `suffix`. A trailing line without `\n` may still change and is
    /// ignored.
    fn scan(&self, suffix: &str) -> Scan {
        let mut scan = Scan {
            split: None,
            fence_open: false,
            edit_open: false,
        };
        let mut pos = 0usize;

        while let Some(newline) = suffix[pos..].find('\n') {
            let line = &suffix[pos..pos + newline];
            let end = pos + newline + 1;
            match self.classifier.classify(line) {
                LineClass::Open if !scan.edit_open => scan.edit_open = true,
                LineClass::Close if scan.edit_open => scan.edit_open = false,
                LineClass::Fence if !scan.edit_open => scan.fence_open = !scan.fence_open,
                LineClass::Blank if !scan.edit_open && !scan.fence_open => scan.split = Some(end),
                _ => {}
            }
            pos = end;
        }

        scan
    }
}
