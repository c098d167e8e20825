//! Rendering pipeline.

pub mod diff_block;
pub mod incremental;
pub mod markdown;
pub mod message;
pub mod navigation;

pub use diff_block::{DiffBlockRenderer, DiffStats};
pub use incremental::{IncrementalMarkdownRenderer, RenderState};
pub use self::markdown::{GfmMarkdown, MarkdownParser};
pub use message::MessageRenderer;
pub use navigation::NavigationEvent;
