use crate::ast::{DirectiveBlock, Node};
use crate::config::UnknownDirectivePolicy;
use crate::context::ParseContext;
use crate::cursor::indentation;
use crate::directives::DirectiveCall;
use crate::error::{ParseError, Result};
use crate::rules::{indented_block, Rule};
use crate::span::Span;

/// Explicit markup directives.
///
/// ```text
/// .. name:: argument
///    :option: value
///
///    Content.
///
/// .. |variable| name:: argument
/// ```
///
/// Lines of the indented block before the first option or blank line extend
/// the argument. Option lines follow, then the content. The registry handler
/// for the name turns the invocation into a node.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveRule;

#[derive(Debug, PartialEq, Eq)]
struct Head<'a> {
    variable: Option<&'a str>,
    name: &'a str,
    argument: &'a str,
}

fn head(line: &str) -> Option<Head<'_>> {
    if indentation(line) > 0 {
        return None;
    }
    let mut rest = line.trim_end().strip_prefix(".. ")?.trim_start();

    let mut variable = None;
    if let Some(inner) = rest.strip_prefix('|') {
        let end = inner.find('|')?;
        let name = inner[..end].trim();
        if name.is_empty() {
            return None;
        }
        variable = Some(name);
        rest = inner[end + 1..].trim_start();
    }

    let end = rest.find("::")?;
    let name = &rest[..end];
    let argument = &rest[end + 2..];
    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_alphanumeric() || "-_+.:".contains(ch));
    if !valid_name || !(argument.is_empty() || argument.starts_with(' ')) {
        return None;
    }

    Some(Head {
        variable,
        name,
        argument: argument.trim(),
    })
}

/// `:key: value` option line.
fn option(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix(':')?;
    let end = rest.find(':')?;
    let key = rest[..end].trim();
    let value = &rest[end + 1..];
    if key.is_empty() || !(value.is_empty() || value.starts_with(' ')) {
        return None;
    }
    Some((key.to_lowercase(), value.trim().to_string()))
}

/// Split a dedented directive block into argument lines, options and
/// content. The last element is the line of `text` the content starts on.
fn split_block(text: &str) -> (Vec<&str>, Vec<(String, String)>, String, usize) {
    let lines: Vec<&str> = text.lines().collect();
    let mut arguments = Vec::new();
    let mut options = Vec::new();
    let mut index = 0;

    while let Some(line) = lines.get(index) {
        if line.trim().is_empty() {
            break;
        }
        if let Some(found) = option(line) {
            options.push(found);
        } else if options.is_empty() {
            arguments.push(line.trim());
        } else {
            break;
        }
        index += 1;
    }

    while lines.get(index).is_some_and(|line| line.trim().is_empty()) {
        index += 1;
    }

    let content = lines[index..].join("\n");
    (arguments, options, content, index)
}

impl Rule for DirectiveRule {
    fn name(&self) -> &'static str {
        "directive"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        ctx.cursor().current().and_then(head).is_some()
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let cursor = ctx.cursor();
        let position = cursor.position();
        let Some(found) = cursor.current().and_then(head) else {
            return Ok(None);
        };

        let name = found.name.to_lowercase();
        let variable = found.variable.map(str::to_string);
        let mut argument = found.argument.to_string();
        let (options, content, content_line, last) = match indented_block(cursor, position + 1, 1)
        {
            // A block after a blank line is all content.
            Some(block) if block.first > position + 1 => {
                (Vec::new(), block.text, block.first, block.last)
            }
            Some(block) => {
                let (more, options, content, offset) = split_block(&block.text);
                for line in more {
                    if !argument.is_empty() {
                        argument.push(' ');
                    }
                    argument.push_str(line);
                }
                (options, content, block.first + offset, block.last)
            }
            None => (Vec::new(), String::new(), position, position),
        };
        let span = Span::lines(position, last);
        ctx.cursor_mut().seek(last);

        let Some(parses_content) = ctx.directives().get(&name).map(|d| d.parses_content()) else {
            return match ctx.config().unknown_directives {
                UnknownDirectivePolicy::Error => Err(ParseError::unknown_directive(&name, position)),
                UnknownDirectivePolicy::Warn => {
                    log::warn!("unknown directive \"{}\" at line {}", name, position + 1);
                    Ok(Some(Node::Directive(DirectiveBlock {
                        name,
                        argument,
                        options,
                        content,
                        span,
                    })))
                }
            };
        };

        let children = if parses_content && !content.is_empty() {
            ctx.parse_nested(&content, content_line)?
        } else {
            Vec::new()
        };
        let call = DirectiveCall {
            name: name.clone(),
            argument,
            variable,
            options,
            content,
            children,
            span,
        };
        match ctx.directives_mut().get_mut(&name) {
            Some(handler) => handler.process(call),
            None => Err(ParseError::unknown_directive(&name, position)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_heads() {
        let found = head(".. Note:: Be careful").unwrap();
        assert_eq!(found.name, "Note");
        assert_eq!(found.argument, "Be careful");
        assert_eq!(found.variable, None);

        let sub = head(".. |name| replace:: text").unwrap();
        assert_eq!(sub.variable, Some("name"));
        assert_eq!(sub.name, "replace");
    }

    #[test]
    fn non_directives() {
        assert!(head(".. a comment").is_none());
        assert!(head(".. two words:: no").is_none());
        assert!(head(".. name::x").is_none());
        assert!(head("   .. note:: indented").is_none());
    }

    #[test]
    fn block_splits_into_argument_options_and_content() {
        let (arguments, options, content, offset) =
            split_block("more argument\n:linenos:\n:caption: Example\n\nbody\n  indented");
        assert_eq!(arguments, vec!["more argument"]);
        assert_eq!(
            options,
            vec![
                ("linenos".to_string(), String::new()),
                ("caption".to_string(), "Example".to_string()),
            ]
        );
        assert_eq!(content, "body\n  indented");
        assert_eq!(offset, 4);
    }
}
