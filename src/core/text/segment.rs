//! Word/space/punctuation run splitting for word-level diffs.

use super::utils::{grapheme_segments, is_punctuation_char, is_whitespace_char};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    Word,
    Space,
    Punctuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRun<'a> {
    pub kind: RunKind,
    pub text: &'a str,
}

fn classify(grapheme: &str) -> RunKind {
    let Some(first) = grapheme.chars().next() else {
        return RunKind::Word;
    };
    if is_whitespace_char(first) {
        RunKind::Space
    } else if is_punctuation_char(first) {
        RunKind::Punctuation
    } else {
        RunKind::Word
    }
}

/// Splits `line` into runs in a single linear pass over its graphemes.
///
/// Consecutive word graphemes and consecutive whitespace graphemes merge into
/// one run each. Punctuation is emitted one grapheme per run so that `);` and
/// `)` still share a token.
pub fn segment_line(line: &str) -> Vec<TextRun<'_>> {
    let mut runs = Vec::new();
    let mut run_start = 0usize;
    let mut run_kind: Option<RunKind> = None;
    let mut offset = 0usize;

    for grapheme in grapheme_segments(line) {
        let kind = classify(grapheme);
        let continues = run_kind == Some(kind) && kind != RunKind::Punctuation;
        if !continues {
            if let Some(prev) = run_kind {
                runs.push(TextRun {
                    kind: prev,
                    text: &line[run_start..offset],
                });
            }
            run_start = offset;
            run_kind = Some(kind);
        }
        offset += grapheme.len();
    }

    if let Some(kind) = run_kind {
        runs.push(TextRun {
            kind,
            text: &line[run_start..offset],
        });
    }

    runs
}
