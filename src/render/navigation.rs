//! Navigation events emitted when a rendered file mention or edit header is activated.

use serde::Serialize;

use crate::core::edit_block::{EditBlock, EditStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub path: String,
    pub estimated_line: Option<usize>,
    /// `None` for a bare file mention.
    pub status: Option<EditStatus>,
    /// First non-blank line of the original block content.
    pub search_context: Option<String>,
}

impl NavigationEvent {
    pub fn for_block(block: &EditBlock) -> Self {
        Self {
            path: block.file_path.clone(),
            estimated_line: block.estimated_line,
            status: Some(block.status),
            search_context: block.search_context().map(str::to_string),
        }
    }

    pub fn for_mention(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            estimated_line: None,
            status: None,
            search_context: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NavigationEvent;
    use crate::core::edit_block::{EditBlock, EditStatus};

    #[test]
    fn block_event_carries_outcome_and_search_context() {
        let block = EditBlock {
            file_path: "src/app.py".into(),
            edit_lines: "\ndef foo():\n    pass".into(),
            repl_lines: String::new(),
            start_index: 0,
            end_index: 5,
            status: EditStatus::Applied,
            estimated_line: Some(42),
            reason: None,
        };
        let event = NavigationEvent::for_block(&block);
        assert_eq!(event.path, "src/app.py");
        assert_eq!(event.estimated_line, Some(42));
        assert_eq!(event.status, Some(EditStatus::Applied));
        assert_eq!(event.search_context.as_deref(), Some("def foo():"));
    }

    #[test]
    fn mention_has_no_status() {
        let event = NavigationEvent::for_mention("README.md");
        assert_eq!(event.status, None);
        assert_eq!(event.search_context, None);
    }
}
