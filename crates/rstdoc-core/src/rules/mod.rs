//! Production rules and the ordered rule set the driver dispatches over.
//!
//! Each rule recognizes one construct at the current cursor line. The driver
//! asks the rules in order and applies the first one whose `applies` returns
//! true. `applies` must not move the cursor. `apply` may consume several
//! lines but must leave the cursor on the last line it consumed: the driver
//! steps once more after every dispatch.
//!
//! The standard order is
//! Title, Transition, Link, LiteralBlock, BlockQuote, List, Directive,
//! Comment, DefinitionList, Table, Paragraph. Title must be tried before
//! Transition so an underline is never read as a transition, and Paragraph
//! accepts every line so it has to stay last.

mod block_quote;
mod comment;
mod definition_list;
mod directive;
mod link;
mod list;
mod literal;
mod paragraph;
mod table;
mod title;
mod transition;

pub use block_quote::BlockQuoteRule;
pub use comment::CommentRule;
pub use definition_list::DefinitionListRule;
pub use directive::DirectiveRule;
pub use link::LinkRule;
pub use list::ListRule;
pub use literal::LiteralBlockRule;
pub use paragraph::ParagraphRule;
pub use table::TableRule;
pub use title::TitleRule;
pub use transition::TransitionRule;

use crate::ast::Node;
use crate::context::ParseContext;
use crate::cursor::{indentation, is_blank, LineCursor};
use crate::error::Result;

/// A production rule.
pub trait Rule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Check if the rule accepts the current line. Must not move the cursor.
    fn applies(&self, ctx: &ParseContext<'_>) -> bool;

    /// Consume the construct and return its node, if it produces one.
    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>>;
}

/// Rules in dispatch order.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Empty rule set. Without a catch-all rule, parsing fails on the first
    /// line nothing accepts.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rule order.
    pub fn standard() -> Self {
        Self::new()
            .with(TitleRule)
            .with(TransitionRule)
            .with(LinkRule)
            .with(LiteralBlockRule)
            .with(BlockQuoteRule)
            .with(ListRule)
            .with(DirectiveRule)
            .with(CommentRule)
            .with(DefinitionListRule)
            .with(TableRule)
            .with(ParagraphRule)
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, rule: impl Rule + 'static) -> Self {
        self.push(rule);
        self
    }

    /// Rules in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| &**rule)
    }

    /// Rule names in dispatch order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Lines of an indented block, dedented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndentedBlock {
    /// Dedented text without leading or trailing blank lines.
    pub text: String,
    /// First non-blank line of the block.
    pub first: usize,
    /// Last non-blank line of the block.
    pub last: usize,
}

/// Collect the block starting at `start` whose non-blank lines are indented
/// by at least `min_indent` columns. Blank lines are skipped; the block ends
/// before the first less-indented non-blank line.
pub(crate) fn indented_block(
    cursor: &LineCursor,
    start: usize,
    min_indent: usize,
) -> Option<IndentedBlock> {
    let mut first = None;
    let mut last = start;
    let mut index = start;
    while let Some(line) = cursor.line(index) {
        if !is_blank(line) {
            if indentation(line) < min_indent {
                break;
            }
            first.get_or_insert(index);
            last = index;
        }
        index += 1;
    }

    let first = first?;
    let lines: Vec<&str> = (first..=last).filter_map(|i| cursor.line(i)).collect();
    Some(IndentedBlock {
        text: dedent(&lines),
        first,
        last,
    })
}

/// Remove the indentation common to every non-blank line and join with `\n`.
pub(crate) fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if is_blank(line) {
                ""
            } else {
                line[indent..].trim_end()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Index of the first non-blank line at or after `start`.
pub(crate) fn next_non_blank(cursor: &LineCursor, start: usize) -> Option<usize> {
    (start..cursor.len()).find(|&index| cursor.line(index).is_some_and(|line| !is_blank(line)))
}

/// Lowercase a reference name and collapse inner whitespace.
pub(crate) fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn loaded(text: &str) -> LineCursor {
        let mut cursor = LineCursor::new();
        cursor.load(&ParserConfig::default(), text);
        cursor
    }

    #[test]
    fn standard_order() {
        assert_eq!(
            RuleSet::standard().names(),
            vec![
                "title",
                "transition",
                "link",
                "literal_block",
                "block_quote",
                "list",
                "directive",
                "comment",
                "definition_list",
                "table",
                "paragraph",
            ]
        );
    }

    #[test]
    fn indented_block_skips_blanks_and_dedents() {
        let cursor = loaded("head\n\n    a\n      b\n\n    c\nnext");
        let block = indented_block(&cursor, 1, 1).unwrap();
        assert_eq!(block.text, "a\n  b\n\nc");
        assert_eq!((block.first, block.last), (2, 5));
    }

    #[test]
    fn indented_block_needs_an_indented_line() {
        let cursor = loaded("head\n\nnext");
        assert!(indented_block(&cursor, 1, 1).is_none());
    }

    #[test]
    fn names_are_normalized() {
        assert_eq!(normalize_name("  Python   Home\tPage "), "python home page");
    }
}
