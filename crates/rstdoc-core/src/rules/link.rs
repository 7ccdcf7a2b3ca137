use crate::ast::{LinkTarget, Node};
use crate::context::ParseContext;
use crate::cursor::{indentation, is_blank};
use crate::error::Result;
use crate::rules::{normalize_name, Rule};
use crate::span::Span;

/// Hyperlink targets.
///
/// ```text
/// .. _name: https://example.org
/// .. _`name with spaces`: https://example.org
/// .. _internal:
/// .. __: https://example.org/anonymous
/// __ https://example.org/anonymous
/// ```
///
/// The destination may continue on indented lines; whitespace inside it is
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkRule;

#[derive(Debug, PartialEq, Eq)]
struct Target<'a> {
    name: Option<String>,
    url: &'a str,
    anonymous: bool,
}

fn target(line: &str) -> Option<Target<'_>> {
    if indentation(line) > 0 {
        return None;
    }
    let line = line.trim_end();

    if let Some(url) = line.strip_prefix("__ ") {
        return Some(Target {
            name: None,
            url,
            anonymous: true,
        });
    }

    let rest = line.strip_prefix(".. _")?;
    if let Some(url) = rest.strip_prefix("_:") {
        if url.is_empty() || url.starts_with(' ') {
            return Some(Target {
                name: None,
                url,
                anonymous: true,
            });
        }
        return None;
    }

    let (name, url) = if let Some(quoted) = rest.strip_prefix('`') {
        let end = quoted.find("`:")?;
        (&quoted[..end], &quoted[end + 2..])
    } else {
        let end = rest
            .match_indices(':')
            .map(|(index, _)| index)
            .find(|&index| rest[index + 1..].is_empty() || rest[index + 1..].starts_with(' '))?;
        (&rest[..end], &rest[end + 1..])
    };
    if name.trim().is_empty() || !(url.is_empty() || url.starts_with(' ')) {
        return None;
    }

    Some(Target {
        name: Some(normalize_name(name)),
        url,
        anonymous: false,
    })
}

impl Rule for LinkRule {
    fn name(&self) -> &'static str {
        "link"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        ctx.cursor().current().and_then(target).is_some()
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let cursor = ctx.cursor();
        let position = cursor.position();
        let Some(found) = cursor.current().and_then(target) else {
            return Ok(None);
        };

        let mut url: String = found.url.split_whitespace().collect();
        let mut last = position;
        while let Some(line) = cursor.line(last + 1) {
            if is_blank(line) || indentation(line) == 0 {
                break;
            }
            url.extend(line.split_whitespace());
            last += 1;
        }

        let target = LinkTarget {
            name: found.name,
            url: (!url.is_empty()).then_some(url),
            anonymous: found.anonymous,
            span: Span::lines(position, last),
        };
        ctx.cursor_mut().seek(last);
        Ok(Some(Node::LinkTarget(target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_quoted_targets() {
        let plain = target(".. _Python: https://python.org").unwrap();
        assert_eq!(plain.name.as_deref(), Some("python"));
        assert_eq!(plain.url.trim(), "https://python.org");

        let quoted = target(".. _`Python  Home`: https://python.org").unwrap();
        assert_eq!(quoted.name.as_deref(), Some("python home"));
    }

    #[test]
    fn colons_inside_names_need_a_space_after_the_last_one() {
        let found = target(".. _a:b: https://example.org").unwrap();
        assert_eq!(found.name.as_deref(), Some("a:b"));
    }

    #[test]
    fn anonymous_forms() {
        assert!(target("__ https://example.org").unwrap().anonymous);
        assert!(target(".. __: https://example.org").unwrap().anonymous);
    }

    #[test]
    fn non_targets() {
        assert!(target(".. note:: text").is_none());
        assert!(target(".. comment").is_none());
        assert!(target("   .. _indented: url").is_none());
        assert!(target(".. _: url").is_none());
    }
}
