use crate::ast::Node;
use crate::context::ParseContext;
use crate::cursor::{adornment_char, adornment_len};
use crate::error::Result;
use crate::rules::Rule;
use crate::span::Span;

/// Minimum length of a transition line.
const MIN_TRANSITION_LEN: usize = 4;

/// A line of four or more repeated punctuation characters that no title
/// claimed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionRule;

impl Rule for TransitionRule {
    fn name(&self) -> &'static str {
        "transition"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        ctx.cursor().current().is_some_and(|line| {
            adornment_char(line).is_some() && adornment_len(line) >= MIN_TRANSITION_LEN
        })
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        Ok(Some(Node::Transition(Span::line(ctx.cursor().position()))))
    }
}
