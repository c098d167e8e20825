//! Diff output types.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffKind {
    Context,
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Same,
    Add,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl CharSegment {
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// One line of a line-level edit script.
///
/// `segments` is only filled in for a remove/add pair the refiner judged to be the same line
/// edited; it always concatenates back to `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    Context(String),
    Add {
        text: String,
        segments: Option<Vec<CharSegment>>,
    },
    Remove {
        text: String,
        segments: Option<Vec<CharSegment>>,
    },
}

impl DiffOp {
    pub fn context(text: impl Into<String>) -> Self {
        DiffOp::Context(text.into())
    }

    pub fn add(text: impl Into<String>) -> Self {
        DiffOp::Add {
            text: text.into(),
            segments: None,
        }
    }

    pub fn remove(text: impl Into<String>) -> Self {
        DiffOp::Remove {
            text: text.into(),
            segments: None,
        }
    }

    pub fn kind(&self) -> DiffKind {
        match self {
            DiffOp::Context(_) => DiffKind::Context,
            DiffOp::Add { .. } => DiffKind::Add,
            DiffOp::Remove { .. } => DiffKind::Remove,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DiffOp::Context(text) => text,
            DiffOp::Add { text, .. } | DiffOp::Remove { text, .. } => text,
        }
    }

    pub fn segments(&self) -> Option<&[CharSegment]> {
        match self {
            DiffOp::Context(_) => None,
            DiffOp::Add { segments, .. } | DiffOp::Remove { segments, .. } => {
                segments.as_deref()
            }
        }
    }

    pub(crate) fn set_segments(&mut self, new_segments: Vec<CharSegment>) {
        match self {
            DiffOp::Context(_) => {}
            DiffOp::Add { segments, .. } | DiffOp::Remove { segments, .. } => {
                *segments = Some(new_segments);
            }
        }
    }
}
