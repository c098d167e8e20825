//! Edit-block extraction.
//!
//! A proposed edit is written into a message as:
//!
//! ```text
//! src/app.py
//! ««« EDIT
//! <original lines>
//! ═══════ REPL
//! <replacement lines>
//! »»» EDIT END
//! ```
//!
//! Markers are case sensitive and must make up the whole trimmed line. The parser is a single
//! pass over lines driven by [`transition`]; unterminated blocks never produce an error, they
//! fall back to plain text (or, in streaming mode, to a [`PendingEdit`]).

use serde::{Deserialize, Serialize};

use crate::core::text::utils::{is_blank, is_fence_line, is_heading_line};

pub const OPEN_MARKER: &str = "««« EDIT";
pub const SEPARATOR_MARKER: &str = "═══════ REPL";
pub const CLOSE_MARKER: &str = "»»» EDIT END";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub open: String,
    pub separator: String,
    pub close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            open: OPEN_MARKER.to_string(),
            separator: SEPARATOR_MARKER.to_string(),
            close: CLOSE_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditStatus {
    #[default]
    Pending,
    Applied,
    Failed,
}

impl EditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EditStatus::Pending => "pending",
            EditStatus::Applied => "applied",
            EditStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBlock {
    pub file_path: String,
    pub edit_lines: String,
    pub repl_lines: String,
    /// Line index of the path line.
    pub start_index: usize,
    /// Line index of the close marker.
    pub end_index: usize,
    pub status: EditStatus,
    pub estimated_line: Option<usize>,
    pub reason: Option<String>,
}

impl EditBlock {
    /// First non-blank line of the original content, used to re-locate the edit in a file that
    /// has changed since.
    pub fn search_context(&self) -> Option<&str> {
        self.edit_lines
            .split('\n')
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    pub fn apply_outcome(&mut self, outcome: &ApplyOutcome) {
        self.status = outcome.status;
        self.reason = outcome.reason.clone();
        self.estimated_line = outcome.estimated_line;
    }
}

/// Host-reported result of writing one edit to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub file_path: String,
    pub status: EditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_line: Option<usize>,
}

/// Attaches outcomes to blocks by path, in order. Blocks without a matching outcome stay as
/// they are.
pub fn apply_outcomes<'a>(
    blocks: impl IntoIterator<Item = &'a mut EditBlock>,
    outcomes: &[ApplyOutcome],
) {
    let mut used = vec![false; outcomes.len()];
    for block in blocks {
        let found = outcomes
            .iter()
            .enumerate()
            .find(|(idx, outcome)| !used[*idx] && outcome.file_path == block.file_path);
        if let Some((idx, outcome)) = found {
            used[idx] = true;
            block.apply_outcome(outcome);
        }
    }
}

/// An edit whose close marker has not arrived yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub file_path: String,
    /// Original content received so far.
    pub search: String,
    /// Replacement content, once the separator has arrived.
    pub replacement: Option<String>,
    /// Line index of the path line.
    pub start_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Edit(EditBlock),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    pub segments: Vec<Segment>,
    pub pending: Option<PendingEdit>,
}

impl ParsedMessage {
    pub fn edit_blocks(&self) -> impl Iterator<Item = &EditBlock> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Edit(block) => Some(block),
            Segment::Text(_) => None,
        })
    }

    pub fn edit_blocks_mut(&mut self) -> impl Iterator<Item = &mut EditBlock> {
        self.segments.iter_mut().filter_map(|segment| match segment {
            Segment::Edit(block) => Some(block),
            Segment::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Idle,
    ExpectStart,
    EditSection,
    ReplSection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    Fence,
    Heading,
    Open,
    Separator,
    Close,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    SetCandidate,
    DropCandidate,
    BeginEdit,
    Accumulate,
    BeginRepl,
    Emit,
    /// The open block is malformed; its lines fall back to plain text.
    Abandon,
    /// An open marker inside an open block. The malformed block is abandoned and a new one
    /// starts if the previous line can serve as its path.
    Restart,
}

/// The whole grammar in one table.
pub fn transition(state: ParserState, class: LineClass) -> (ParserState, Action) {
    use LineClass as L;
    use ParserState as S;

    match (state, class) {
        (S::Idle, L::Other) => (S::ExpectStart, Action::SetCandidate),
        (S::Idle, _) => (S::Idle, Action::None),

        (S::ExpectStart, L::Open) => (S::EditSection, Action::BeginEdit),
        (S::ExpectStart, L::Other) => (S::ExpectStart, Action::SetCandidate),
        (S::ExpectStart, _) => (S::Idle, Action::DropCandidate),

        (S::EditSection, L::Separator) => (S::ReplSection, Action::BeginRepl),
        (S::EditSection, L::Close) => (S::Idle, Action::Abandon),
        (S::EditSection | S::ReplSection, L::Open) => (S::EditSection, Action::Restart),
        (S::EditSection, _) => (S::EditSection, Action::Accumulate),

        (S::ReplSection, L::Close) => (S::Idle, Action::Emit),
        (S::ReplSection, _) => (S::ReplSection, Action::Accumulate),
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditBlockParser {
    markers: Markers,
}

impl EditBlockParser {
    pub fn new(markers: Markers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn classify(&self, line: &str) -> LineClass {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            LineClass::Blank
        } else if trimmed == self.markers.open {
            LineClass::Open
        } else if trimmed == self.markers.separator {
            LineClass::Separator
        } else if trimmed == self.markers.close {
            LineClass::Close
        } else if is_fence_line(trimmed) {
            LineClass::Fence
        } else if is_heading_line(trimmed) {
            LineClass::Heading
        } else {
            LineClass::Other
        }
    }

    /// Finalized parse: every closed block, plus the plain spans around them.
    pub fn parse(&self, text: &str) -> ParsedMessage {
        self.parse_lines(&split_lines(text), false)
    }

    /// Like [`EditBlockParser::parse`], additionally reporting the trailing unterminated block.
    pub fn parse_streaming(&self, text: &str) -> ParsedMessage {
        self.parse_lines(&split_lines(text), true)
    }

    fn parse_lines(&self, lines: &[&str], streaming: bool) -> ParsedMessage {
        let mut segments = Vec::new();
        let mut state = ParserState::Idle;
        let mut candidate: Option<usize> = None;
        let mut edit_buf: Vec<&str> = Vec::new();
        let mut repl_buf: Vec<&str> = Vec::new();
        let mut span_start = 0usize;

        for (idx, &line) in lines.iter().enumerate() {
            let (mut next, action) = transition(state, self.classify(line));
            match action {
                Action::None | Action::DropCandidate => candidate = None,
                Action::SetCandidate => candidate = Some(idx),
                Action::BeginEdit => {
                    edit_buf.clear();
                    repl_buf.clear();
                }
                Action::Accumulate => {
                    if state == ParserState::EditSection {
                        edit_buf.push(line);
                    } else {
                        repl_buf.push(line);
                    }
                }
                Action::BeginRepl => {}
                Action::Abandon => candidate = None,
                Action::Restart => {
                    edit_buf.clear();
                    repl_buf.clear();
                    candidate = idx
                        .checked_sub(1)
                        .filter(|&prev| self.classify(lines[prev]) == LineClass::Other);
                    if candidate.is_none() {
                        next = ParserState::Idle;
                    }
                }
                Action::Emit => {
                    if let Some(path_idx) = candidate.take() {
                        push_text(&mut segments, &lines[span_start..path_idx]);
                        segments.push(Segment::Edit(EditBlock {
                            file_path: normalize_path(lines[path_idx]),
                            edit_lines: edit_buf.join("\n"),
                            repl_lines: repl_buf.join("\n"),
                            start_index: path_idx,
                            end_index: idx,
                            status: EditStatus::Pending,
                            estimated_line: None,
                            reason: None,
                        }));
                        span_start = idx + 1;
                    }
                }
            }
            state = next;
        }

        let pending = if streaming {
            self.find_pending(lines)
                .filter(|pending| pending.start_index >= span_start)
        } else {
            None
        };
        let text_end = pending
            .as_ref()
            .map_or(lines.len(), |pending| pending.start_index);
        push_text(&mut segments, &lines[span_start..text_end.max(span_start)]);

        ParsedMessage { segments, pending }
    }

    fn find_pending(&self, lines: &[&str]) -> Option<PendingEdit> {
        let mut last_open = None;
        let mut last_close = None;
        for (idx, line) in lines.iter().enumerate() {
            match self.classify(line) {
                LineClass::Open => last_open = Some(idx),
                LineClass::Close => last_close = Some(idx),
                _ => {}
            }
        }

        let open_idx = last_open?;
        if last_close.is_some_and(|close_idx| close_idx > open_idx) || open_idx == 0 {
            return None;
        }
        let path_idx = open_idx - 1;
        if self.classify(lines[path_idx]) != LineClass::Other {
            return None;
        }

        let body = &lines[open_idx + 1..];
        let (search, replacement) = match body
            .iter()
            .position(|line| self.classify(line) == LineClass::Separator)
        {
            Some(sep) => (body[..sep].join("\n"), Some(body[sep + 1..].join("\n"))),
            None => (body.join("\n"), None),
        };

        Some(PendingEdit {
            file_path: normalize_path(lines[path_idx]),
            search,
            replacement,
            start_index: path_idx,
        })
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

fn push_text(segments: &mut Vec<Segment>, lines: &[&str]) {
    if lines.iter().all(|line| is_blank(line)) {
        return;
    }
    segments.push(Segment::Text(lines.join("\n")));
}

/// Paths are often wrapped in inline code or bold by the model.
fn normalize_path(line: &str) -> String {
    let mut path = line.trim();
    for wrapper in ["**", "`"] {
        if path.len() > 2 * wrapper.len() && path.starts_with(wrapper) && path.ends_with(wrapper) {
            path = &path[wrapper.len()..path.len() - wrapper.len()];
        }
    }
    path.trim().to_string()
}
