//! Restartable line cursor over a loaded document.
//!
//! The cursor is shared between the driver and the production rules. A rule
//! may advance it over several lines inside `apply`; the driver then steps
//! once more. Rules must therefore leave the cursor on the last line they
//! consumed, never past it.
//!
//! Loading splits the input with `memchr` newline scanning, strips a trailing
//! carriage return from each line and expands tabs to the configured width.

use memchr::memchr;

use crate::config::ParserConfig;

/// Punctuation usable for section adornments and transitions.
const ADORNMENT_CHARS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Stateful cursor over the lines of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCursor {
    lines: Vec<String>,
    position: usize,
}

impl LineCursor {
    /// Create an empty cursor. `valid()` is false until something is loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any prior state with the lines of `text`, positioned on the
    /// first line.
    pub fn load(&mut self, config: &ParserConfig, text: &str) {
        self.lines = split_lines(text, config.tab_width);
        self.position = 0;
        log::trace!("cursor loaded {} lines", self.lines.len());
    }

    /// True while an unconsumed line exists.
    #[inline]
    pub fn valid(&self) -> bool {
        self.position < self.lines.len()
    }

    /// Advance one line. Does nothing once the cursor is exhausted.
    #[inline]
    pub fn next_line(&mut self) {
        if self.valid() {
            self.position += 1;
        }
    }

    /// Advance `count` lines, stopping at the end.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        self.position = (self.position + count).min(self.lines.len());
    }

    /// Move to an absolute line index, clamped to the end.
    #[inline]
    pub fn seek(&mut self, index: usize) {
        self.position = index.min(self.lines.len());
    }

    /// The active line.
    #[inline]
    pub fn current(&self) -> Option<&str> {
        self.line(self.position)
    }

    /// The line `offset` positions after the active one.
    #[inline]
    pub fn peek(&self, offset: usize) -> Option<&str> {
        self.line(self.position + offset)
    }

    /// The line before the active one.
    #[inline]
    pub fn previous(&self) -> Option<&str> {
        self.position.checked_sub(1).and_then(|index| self.line(index))
    }

    /// Any line by absolute index.
    #[inline]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Index of the active line.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of loaded lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if no line was loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All loaded lines.
    #[inline]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

fn split_lines(text: &str, tab_width: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(text.len() / 32 + 1);
    if text.is_empty() {
        return lines;
    }

    let bytes = text.as_bytes();
    let mut start = 0;
    loop {
        let end = match memchr(b'\n', &bytes[start..]) {
            Some(pos) => start + pos,
            None => bytes.len(),
        };
        let line = &text[start..end];
        let line = line.strip_suffix('\r').unwrap_or(line);
        lines.push(expand_tabs(line, tab_width));

        if end >= bytes.len() {
            break;
        }
        start = end + 1;
    }
    lines
}

fn expand_tabs(line: &str, tab_width: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let tab_width = tab_width.max(1);
    let mut expanded = String::with_capacity(line.len() + tab_width);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = tab_width - column % tab_width;
            expanded.push_str(&" ".repeat(pad));
            column += pad;
        } else {
            expanded.push(ch);
            column += 1;
        }
    }
    expanded
}

/// Check if a line contains only whitespace.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

/// Number of leading spaces.
#[inline]
pub fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// The repeated character of an adornment line such as `=====` or `----`.
///
/// Adornment lines start in column zero and repeat a single punctuation
/// character (trailing whitespace ignored). A lone `=` under a one-letter
/// title counts; rules decide the minimum length they need.
pub fn adornment_char(line: &str) -> Option<char> {
    let line = line.trim_end();
    let mut chars = line.chars();
    let first = chars.next()?;
    if !ADORNMENT_CHARS.contains(first) {
        return None;
    }
    chars.all(|ch| ch == first).then_some(first)
}

/// Length in characters of an adornment line, ignoring trailing whitespace.
#[inline]
pub fn adornment_len(line: &str) -> usize {
    line.trim_end().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(text: &str) -> LineCursor {
        let mut cursor = LineCursor::new();
        cursor.load(&ParserConfig::default(), text);
        cursor
    }

    #[test]
    fn empty_input_is_immediately_invalid() {
        let cursor = loaded("");
        assert!(!cursor.valid());
        assert!(cursor.current().is_none());
    }

    #[test]
    fn next_line_past_end_is_a_no_op() {
        let mut cursor = loaded("only");
        cursor.next_line();
        assert!(!cursor.valid());
        cursor.next_line();
        cursor.next_line();
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn load_replaces_previous_state() {
        let mut cursor = loaded("a\nb\nc");
        cursor.advance(2);
        cursor.load(&ParserConfig::default(), "x");
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.current(), Some("x"));
        assert_eq!(cursor.len(), 1);
    }

    #[test]
    fn crlf_and_tabs_are_normalized() {
        let cursor = loaded("a\r\n\tb\r\nc");
        assert_eq!(cursor.lines(), &["a", "        b", "c"]);
    }

    #[test]
    fn tab_expansion_respects_width_and_column() {
        let mut cursor = LineCursor::new();
        cursor.load(&ParserConfig::default().with_tab_width(4), "ab\tc");
        assert_eq!(cursor.current(), Some("ab  c"));
    }

    #[test]
    fn interior_blank_lines_are_kept() {
        let cursor = loaded("a\n\nb");
        assert_eq!(cursor.len(), 3);
        assert!(is_blank(cursor.line(1).unwrap()));
    }

    #[test]
    fn peek_and_previous_are_relative() {
        let mut cursor = loaded("a\nb\nc");
        cursor.next_line();
        assert_eq!(cursor.previous(), Some("a"));
        assert_eq!(cursor.current(), Some("b"));
        assert_eq!(cursor.peek(1), Some("c"));
        assert_eq!(cursor.peek(2), None);
    }

    #[test]
    fn adornment_detection() {
        assert_eq!(adornment_char("====="), Some('='));
        assert_eq!(adornment_char("--  "), Some('-'));
        assert_eq!(adornment_char("=-=-"), None);
        assert_eq!(adornment_char(" ===="), None);
        assert_eq!(adornment_char("="), Some('='));
        assert_eq!(adornment_char(""), None);
        assert_eq!(adornment_char("aaaa"), None);
        assert_eq!(adornment_len("~~~~   "), 4);
    }
}
