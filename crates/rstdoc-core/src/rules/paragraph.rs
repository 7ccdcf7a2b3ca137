use crate::ast::{Node, Paragraph};
use crate::context::ParseContext;
use crate::cursor::is_blank;
use crate::error::Result;
use crate::rules::Rule;
use crate::span::Span;

/// Catch-all: blank lines produce nothing, anything else starts a paragraph
/// running to the next blank line.
///
/// A paragraph ending in `::` announces a literal block. `text::` keeps one
/// colon, `text ::` loses both, and a paragraph that is only `::` produces
/// no node.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphRule;

impl Rule for ParagraphRule {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn applies(&self, _ctx: &ParseContext<'_>) -> bool {
        true
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let cursor = ctx.cursor();
        let position = cursor.position();
        if cursor.current().map_or(true, is_blank) {
            return Ok(None);
        }

        let mut lines = Vec::new();
        while let Some(line) = cursor.line(position + lines.len()) {
            if is_blank(line) {
                break;
            }
            lines.push(line.trim_end());
        }
        let last = position + lines.len() - 1;
        let mut text = lines.join("\n");

        let announces_literal = text.ends_with("::");
        if announces_literal {
            text.truncate(text.len() - 1);
            let stripped = &text[..text.len() - 1];
            if stripped.trim().is_empty() || stripped.ends_with(char::is_whitespace) {
                text = stripped.trim_end().to_string();
            }
        }

        ctx.cursor_mut().seek(last);
        if announces_literal {
            ctx.expect_literal_after(last);
        }
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Node::Paragraph(Paragraph {
            text,
            span: Span::lines(position, last),
        })))
    }
}
