use crate::ast::{DefinitionItem, DefinitionList, Node};
use crate::context::ParseContext;
use crate::cursor::{adornment_char, indentation, is_blank, LineCursor};
use crate::error::Result;
use crate::rules::{indented_block, next_non_blank, Rule};
use crate::span::Span;

/// Terms followed directly by an indented definition.
///
/// ```text
/// term : classifier
///     Definition text.
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionListRule;

fn is_term(cursor: &LineCursor, index: usize) -> bool {
    let (Some(term), Some(next)) = (cursor.line(index), cursor.line(index + 1)) else {
        return false;
    };
    !is_blank(term)
        && indentation(term) == 0
        && !term.starts_with("..")
        && adornment_char(term).is_none()
        && !is_blank(next)
        && indentation(next) > 0
}

fn split_term(line: &str) -> (String, Vec<String>) {
    let mut parts = line.trim().split(" : ");
    let term = parts.next().unwrap_or_default().trim().to_string();
    let classifiers = parts
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    (term, classifiers)
}

impl Rule for DefinitionListRule {
    fn name(&self) -> &'static str {
        "definition_list"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        let cursor = ctx.cursor();
        is_term(cursor, cursor.position())
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let position = ctx.cursor().position();
        let mut items = Vec::new();
        let mut index = position;
        let mut last = position;

        loop {
            let cursor = ctx.cursor();
            let Some(block) = indented_block(cursor, index + 1, 1) else {
                break;
            };
            let (term, classifiers) = split_term(cursor.line(index).unwrap_or_default());
            let definition = ctx.parse_nested(&block.text, block.first)?;
            items.push(DefinitionItem {
                term,
                classifiers,
                definition,
                span: Span::lines(index, block.last),
            });
            last = block.last;

            let cursor = ctx.cursor();
            match next_non_blank(cursor, last + 1) {
                Some(next) if is_term(cursor, next) => index = next,
                _ => break,
            }
        }

        ctx.cursor_mut().seek(last);
        Ok(Some(Node::DefinitionList(DefinitionList {
            items,
            span: Span::lines(position, last),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifiers_are_split_off() {
        let (term, classifiers) = split_term("width : integer : optional");
        assert_eq!(term, "width");
        assert_eq!(classifiers, vec!["integer", "optional"]);
    }

    #[test]
    fn colon_without_spaces_stays_in_term() {
        let (term, classifiers) = split_term("key:value");
        assert_eq!(term, "key:value");
        assert!(classifiers.is_empty());
    }
}
