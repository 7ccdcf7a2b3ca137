use crate::ast::{LiteralBlock, Node};
use crate::context::ParseContext;
use crate::cursor::{adornment_char, indentation, is_blank, LineCursor};
use crate::error::{ParseError, Result};
use crate::rules::{indented_block, next_non_blank, Rule};
use crate::span::Span;

/// Verbatim block announced by a paragraph ending in `::`.
///
/// The block is either indented, or unindented with every line starting
/// with the same punctuation character (a quoted literal block). It must
/// follow the announcing paragraph directly, after blank lines only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralBlockRule;

fn quoted_block(cursor: &LineCursor, first: usize) -> Option<(String, usize)> {
    let quote = cursor.line(first)?.chars().next()?;
    if adornment_char(&quote.to_string()).is_none() {
        return None;
    }

    let mut lines = Vec::new();
    while let Some(line) = cursor.line(first + lines.len()) {
        if is_blank(line) || !line.starts_with(quote) {
            break;
        }
        lines.push(line.trim_end());
    }
    let last = first + lines.len().saturating_sub(1);
    Some((lines.join("\n"), last))
}

impl Rule for LiteralBlockRule {
    fn name(&self) -> &'static str {
        "literal_block"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        let position = ctx.cursor().position();
        position > 0 && ctx.literal_announced_at() == Some(position - 1)
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        ctx.clear_literal();
        let cursor = ctx.cursor();
        let position = cursor.position();

        let found = match next_non_blank(cursor, position) {
            Some(first) if cursor.line(first).is_some_and(|line| indentation(line) > 0) => {
                indented_block(cursor, first, 1).map(|block| (block.text, block.first, block.last))
            }
            Some(first) => quoted_block(cursor, first).map(|(text, last)| (text, first, last)),
            None => None,
        };
        let Some((text, first, last)) = found else {
            let text = cursor.current().unwrap_or_default();
            return Err(ParseError::syntax(
                "literal block expected after \"::\"",
                position,
                text,
            ));
        };

        ctx.cursor_mut().seek(last);
        Ok(Some(Node::LiteralBlock(LiteralBlock {
            text,
            span: Span::lines(first, last),
        })))
    }
}
