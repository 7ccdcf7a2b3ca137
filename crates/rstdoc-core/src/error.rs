//! Located parse errors.
//!
//! A parse either completes or stops at the first error. Errors raised by
//! production rules carry the cursor line they were detected on and, where
//! useful, the offending text.

use thiserror::Error;

/// Result alias used throughout the parser.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Error kinds for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Malformed structure detected by a production rule.
    Syntax,
    /// Directive name with no registered handler.
    UnknownDirective,
    /// A directive handler rejected its invocation.
    InvalidDirective,
    /// No production rule accepted the current line.
    ///
    /// The standard rule set ends with a catch-all paragraph rule, so this
    /// only surfaces with a custom rule set that lacks one.
    NoRuleApplied,
}

/// A parse error with its location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", location(.line))]
pub struct ParseError {
    /// Error categorization
    pub kind: ParseErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Zero-based cursor line where the error was detected
    pub line: Option<usize>,
    /// The offending source line, when one is known
    pub text: Option<String>,
}

impl ParseError {
    /// Create an error of the given kind.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            text: None,
        }
    }

    /// Create an error for malformed structure.
    pub fn syntax(message: impl Into<String>, line: usize, text: &str) -> Self {
        Self::new(ParseErrorKind::Syntax, message, Some(line)).with_text(text)
    }

    /// Create an error for a directive without a handler.
    pub fn unknown_directive(name: &str, line: usize) -> Self {
        Self::new(
            ParseErrorKind::UnknownDirective,
            format!("unknown directive \"{}\"", name),
            Some(line),
        )
    }

    /// Create an error for a directive whose handler refused the input.
    pub fn invalid_directive(name: &str, reason: &str, line: usize) -> Self {
        Self::new(
            ParseErrorKind::InvalidDirective,
            format!("invalid \"{}\" directive: {}", name, reason),
            Some(line),
        )
    }

    /// Create an error for a line no rule accepted.
    pub fn no_rule_applied(line: usize, text: &str) -> Self {
        Self::new(
            ParseErrorKind::NoRuleApplied,
            "no production rule applies",
            Some(line),
        )
        .with_text(text)
    }

    /// Attach the offending source text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Move the reported line down by `offset`, for errors raised in a block
    /// that starts `offset` lines into the enclosing text.
    pub fn offset_line(mut self, offset: usize) -> Self {
        if let Some(line) = &mut self.line {
            *line += offset;
        }
        self
    }
}

fn location(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line + 1),
        None => String::new(),
    }
}
