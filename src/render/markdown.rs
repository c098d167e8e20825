//! Markdown primitive used for committed spans and the final parse.

use markdown::{to_html_with_options, Options};

use crate::error::RenderError;

/// Black-box markdown-to-markup conversion supplied by the host.
pub trait MarkdownParser {
    fn render(&self, source: &str) -> Result<String, RenderError>;
}

impl<F> MarkdownParser for F
where
    F: Fn(&str) -> Result<String, RenderError>,
{
    fn render(&self, source: &str) -> Result<String, RenderError> {
        self(source)
    }
}

/// GitHub-flavored markdown to HTML via the `markdown` crate. Raw HTML in the source is
/// escaped, not passed through.
#[derive(Debug, Clone, Copy, Default)]
pub struct GfmMarkdown;

impl GfmMarkdown {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownParser for GfmMarkdown {
    fn render(&self, source: &str) -> Result<String, RenderError> {
        to_html_with_options(source, &Options::gfm()).map_err(|message| RenderError::Markdown {
            bytes: source.len(),
            message: message.to_string(),
        })
    }
}
