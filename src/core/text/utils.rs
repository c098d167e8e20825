//! Character classes and markup escaping shared by the segmenter and renderers.

use unicode_segmentation::UnicodeSegmentation;

pub fn grapheme_segments(text: &str) -> unicode_segmentation::Graphemes<'_> {
    UnicodeSegmentation::graphemes(text, true)
}

pub fn is_whitespace_char(ch: char) -> bool {
    ch.is_whitespace()
}

/// `_` is deliberately absent so identifiers stay a single word run.
pub fn is_punctuation_char(ch: char) -> bool {
    matches!(
        ch,
        '(' | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | '<'
            | '>'
            | '.'
            | ','
            | ';'
            | ':'
            | '\''
            | '"'
            | '!'
            | '?'
            | '+'
            | '-'
            | '='
            | '*'
            | '/'
            | '\\'
            | '|'
            | '&'
            | '%'
            | '^'
            | '$'
            | '#'
            | '@'
            | '~'
            | '`'
    ) || (!ch.is_ascii() && !ch.is_alphanumeric() && !ch.is_whitespace())
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes `text` and turns every newline into a `<br />` line break.
pub fn escape_with_breaks(text: &str) -> String {
    text.split('\n')
        .map(|line| escape_html(line.strip_suffix('\r').unwrap_or(line)))
        .collect::<Vec<String>>()
        .join("<br />\n")
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

pub fn is_heading_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}
