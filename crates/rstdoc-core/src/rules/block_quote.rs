use crate::ast::{BlockQuote, Node};
use crate::context::ParseContext;
use crate::cursor::{indentation, is_blank};
use crate::error::Result;
use crate::rules::{indented_block, Rule};
use crate::span::Span;

/// Indented text not claimed by a literal block. The content is parsed
/// again as a document of its own; a final `-- name` paragraph becomes the
/// attribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockQuoteRule;

/// Split a trailing attribution off dedented quote text.
fn split_attribution(text: &str) -> (&str, Option<String>) {
    let Some(start) = text.rfind("\n\n") else {
        return (text, None);
    };
    let tail = text[start + 2..].trim_start_matches('\n');
    let Some(first) = tail.lines().next() else {
        return (text, None);
    };
    let marker = ["-- ", "--- ", "\u{2014} "]
        .iter()
        .find_map(|marker| first.strip_prefix(marker));
    let Some(name) = marker else {
        return (text, None);
    };

    let continuation = tail.lines().skip(1).map(str::trim);
    let attribution = std::iter::once(name.trim())
        .chain(continuation)
        .collect::<Vec<_>>()
        .join(" ");
    (text[..start].trim_end(), Some(attribution))
}

impl Rule for BlockQuoteRule {
    fn name(&self) -> &'static str {
        "block_quote"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        ctx.cursor()
            .current()
            .is_some_and(|line| !is_blank(line) && indentation(line) > 0)
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let position = ctx.cursor().position();
        let Some(block) = indented_block(ctx.cursor(), position, 1) else {
            return Ok(None);
        };

        let (body, attribution) = split_attribution(&block.text);
        let children = ctx.parse_nested(body, block.first)?;
        ctx.cursor_mut().seek(block.last);
        Ok(Some(Node::BlockQuote(BlockQuote {
            children,
            attribution,
            span: Span::lines(block.first, block.last),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribution_after_blank_line() {
        let (body, attribution) = split_attribution("Quote text.\n\n-- Ada Lovelace");
        assert_eq!(body, "Quote text.");
        assert_eq!(attribution.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn dash_inside_paragraph_is_not_attribution() {
        let (body, attribution) = split_attribution("Quote\n-- not an attribution");
        assert_eq!(body, "Quote\n-- not an attribution");
        assert!(attribution.is_none());
    }
}
