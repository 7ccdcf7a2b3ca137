use crate::ast::Node;
use crate::context::ParseContext;
use crate::cursor::{indentation, is_blank};
use crate::error::Result;
use crate::rules::{indented_block, Rule};

/// Explicit markup that is neither a target nor a directive. The marker
/// line and its indented continuation are dropped.
///
/// An empty `..` followed by a blank line is a comment of its own, so the
/// indented block after it is parsed normally.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentRule;

impl Rule for CommentRule {
    fn name(&self) -> &'static str {
        "comment"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        ctx.cursor().current().is_some_and(|line| {
            indentation(line) == 0 && (line.trim_end() == ".." || line.starts_with(".. "))
        })
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let cursor = ctx.cursor();
        let position = cursor.position();
        let empty = cursor.current().is_some_and(|line| line.trim_end() == "..");
        let blank_after = cursor.peek(1).map_or(true, is_blank);

        let last = if empty && blank_after {
            position
        } else {
            indented_block(cursor, position + 1, 1).map_or(position, |block| block.last)
        };
        log::trace!("comment spans lines {}..={}", position + 1, last + 1);
        ctx.cursor_mut().seek(last);
        Ok(None)
    }
}
