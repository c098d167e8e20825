use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The markdown primitive rejected a span. Never masked: a failing parser is a
    /// misconfigured collaborator.
    #[error("markdown parser failed on a {bytes}-byte span: {message}")]
    Markdown { bytes: usize, message: String },
}
