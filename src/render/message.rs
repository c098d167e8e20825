//! Message-level rendering: live streaming frames and the final authoritative pass.

use crate::config::EngineConfig;
use crate::core::edit_block::{
    apply_outcomes, ApplyOutcome, EditBlockParser, ParsedMessage, Segment,
};
use crate::core::text::utils::escape_with_breaks;
use crate::diff::{CacheStats, CharDiffRefiner, LineDiffEngine};
use crate::error::RenderError;
use crate::render::diff_block::DiffBlockRenderer;
use crate::render::incremental::{IncrementalMarkdownRenderer, RenderState};
use crate::render::markdown::{GfmMarkdown, MarkdownParser};
use crate::render::navigation::NavigationEvent;

/// Everything but the incremental state, so a commit callback can borrow it while the
/// incremental renderer is borrowed mutably.
struct Pipeline<P> {
    parser: EditBlockParser,
    markdown: P,
    blocks: DiffBlockRenderer,
}

impl<P: MarkdownParser> Pipeline<P> {
    /// Full render of `text`: markdown for plain spans, diff blocks for edit spans.
    fn render_document(
        &mut self,
        text: &str,
        outcomes: &[ApplyOutcome],
    ) -> Result<String, RenderError> {
        let mut parsed = self.parser.parse(text);
        apply_outcomes(parsed.edit_blocks_mut(), outcomes);

        let mut out = String::new();
        for segment in &parsed.segments {
            match segment {
                Segment::Text(span) => out.push_str(&self.markdown.render(span)?),
                Segment::Edit(block) => out.push_str(&self.blocks.render(block)),
            }
        }
        Ok(out)
    }

    /// Cheap rendering of the uncommitted tail. Closed blocks still go through the cached
    /// diff; everything else is escaped text.
    fn render_tail(&mut self, tail: &str) -> String {
        let parsed = self.parser.parse_streaming(tail);
        let mut out = String::new();
        for segment in &parsed.segments {
            match segment {
                Segment::Text(span) => {
                    out.push_str("<p class=\"streaming\">");
                    out.push_str(&escape_with_breaks(span));
                    out.push_str("</p>\n");
                }
                Segment::Edit(block) => out.push_str(&self.blocks.render(block)),
            }
        }
        if let Some(pending) = parsed.pending.as_ref() {
            out.push_str(&self.blocks.render_pending(pending));
        }
        out
    }
}

/// One engine instance per conversation view. Owns the diff cache and the incremental state
/// of the message currently streaming.
pub struct MessageRenderer<P = GfmMarkdown> {
    pipeline: Pipeline<P>,
    incremental: IncrementalMarkdownRenderer,
}

impl MessageRenderer<GfmMarkdown> {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_markdown(config, GfmMarkdown::new())
    }
}

impl Default for MessageRenderer<GfmMarkdown> {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl<P: MarkdownParser> MessageRenderer<P> {
    pub fn with_markdown(config: &EngineConfig, markdown: P) -> Self {
        let blocks = DiffBlockRenderer::new(
            LineDiffEngine::new(config.diff_cache_capacity),
            CharDiffRefiner::new(config.similarity_threshold),
        );
        Self {
            pipeline: Pipeline {
                parser: EditBlockParser::new(config.markers.clone()),
                markdown,
                blocks,
            },
            incremental: IncrementalMarkdownRenderer::new(
                config.markers.clone(),
                config.split_policy,
            ),
        }
    }

    /// Markup for the current snapshot of a message that is still streaming.
    ///
    /// Call with successive snapshots; a snapshot that does not extend the previous one is
    /// treated as a new message.
    pub fn render_streaming(&mut self, text: &str) -> Result<String, RenderError> {
        let Self {
            pipeline,
            incremental,
        } = self;
        let tail = incremental.advance(text, |chunk| pipeline.render_document(chunk, &[]))?;
        let mut out = incremental.committed_markup().to_string();
        out.push_str(&pipeline.render_tail(tail));
        Ok(out)
    }

    /// Drops streaming state and renders `text` once, authoritatively.
    pub fn finalize(
        &mut self,
        text: &str,
        outcomes: &[ApplyOutcome],
    ) -> Result<String, RenderError> {
        self.incremental.reset();
        self.render_full(text, outcomes)
    }

    /// Non-incremental render of a complete message. Does not touch streaming state.
    pub fn render_full(
        &mut self,
        text: &str,
        outcomes: &[ApplyOutcome],
    ) -> Result<String, RenderError> {
        self.pipeline.render_document(text, outcomes)
    }

    pub fn parse(&self, text: &str) -> ParsedMessage {
        self.pipeline.parser.parse(text)
    }

    pub fn parse_streaming(&self, text: &str) -> ParsedMessage {
        self.pipeline.parser.parse_streaming(text)
    }

    /// One event per edit block, in message order, with outcomes attached.
    pub fn navigation_events(
        &self,
        text: &str,
        outcomes: &[ApplyOutcome],
    ) -> Vec<NavigationEvent> {
        let mut parsed = self.parse(text);
        apply_outcomes(parsed.edit_blocks_mut(), outcomes);
        parsed.edit_blocks().map(NavigationEvent::for_block).collect()
    }

    /// Event for an activated element's `data-path`. An edit header resolves to the first
    /// block for that path; any other path is a bare file mention.
    pub fn activate(&self, text: &str, outcomes: &[ApplyOutcome], path: &str) -> NavigationEvent {
        self.navigation_events(text, outcomes)
            .into_iter()
            .find(|event| event.path == path)
            .unwrap_or_else(|| NavigationEvent::for_mention(path))
    }

    pub fn streaming_state(&self) -> &RenderState {
        self.incremental.state()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.pipeline.blocks.cache_stats()
    }
}
